// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

mod change;
mod request;
mod row;
mod schema;
mod sequence;
mod status;
mod view;

pub use change::{ChangeRecord, ChangeType, RowReference};
pub use request::{RowSelection, SchemaChangeRequest, TableChange, TableChangeResult};
pub use row::{Row, RowSet, SparseChangeSet, SparseRow};
pub use schema::{ColumnChange, ColumnModel, SchemaChangeSet};
pub use sequence::{RowIdRange, SequenceRecord};
pub use status::{IndexState, IndexStatus};
pub use view::ViewDefinition;
