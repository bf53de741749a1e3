// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

//! Persistent metadata of the table versioning subsystem: per-table
//! sequences, the append-only change log, row-level conflict detection, view
//! definitions with their dependency edges, and index statuses.

pub mod change;
pub mod conflict;
pub mod sequence;
pub mod status;
mod validate;
pub mod view;

pub use change::ChangeLogStore;
pub use conflict::ConflictDetector;
pub use sequence::SequenceAllocator;
pub use status::StatusCatalog;
pub use validate::validate_rows;
pub use view::ViewCatalog;
