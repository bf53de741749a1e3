// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use serde::{Deserialize, Serialize};
use tablelog_type::{ColumnId, Result, TableId};

use crate::model::ColumnModel;

/// Kind of entity a table id names; selects the appendable target.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
	Table,
	EntityView,
	MaterializedView,
}

/// Column models and schema bindings, owned outside this subsystem.
pub trait SchemaProvider: Send + Sync {
	/// `None` when the table does not exist.
	fn table_kind(&self, table: TableId) -> Result<Option<TargetKind>>;

	/// The ordered columns currently bound to the table or view.
	fn current_schema(&self, table: TableId) -> Result<Vec<ColumnModel>>;

	/// Resolves column ids to models, preserving order.
	fn columns(&self, ids: &[ColumnId]) -> Result<Vec<ColumnModel>>;

	/// Binds an ordered column list to the table or view.
	fn bind_schema(&self, table: TableId, columns: &[ColumnId]) -> Result<()>;
}
