// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use tablelog_type::{Result, TableId};

use crate::{
	interface::QueryPlan,
	model::{ColumnModel, SparseChangeSet},
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotId(pub u64);

/// A change applied to an ephemeral snapshot during validation.
#[derive(Debug, Clone, Copy)]
pub enum SnapshotChange<'a> {
	Rows(&'a SparseChangeSet),
	/// The full schema the table would have after the change.
	Schema(&'a [ColumnModel]),
}

/// Physical indexes of tables and views, owned by the query engine.
pub trait IndexEngine: Send + Sync {
	fn exists(&self, target: TableId) -> Result<bool>;

	fn create_index(&self, target: TableId, schema: &[ColumnModel]) -> Result<()>;

	/// Dropping a missing index is not an error.
	fn drop_index(&self, target: TableId) -> Result<()>;

	/// Upserts rows and removes deleted ones.
	fn apply_row_changes(&self, target: TableId, changes: &SparseChangeSet) -> Result<()>;

	fn update_schema(&self, target: TableId, schema: &[ColumnModel]) -> Result<()>;

	/// Fills an empty index by executing `plan` against its source indexes.
	/// Returns the number of rows written.
	fn populate(&self, target: TableId, plan: &QueryPlan) -> Result<u64>;

	/// Builds the auxiliary index of a list-typed column.
	fn create_list_column_index(&self, target: TableId, column: &ColumnModel) -> Result<()>;

	/// Materializes a private copy of the current index of `source`.
	fn create_snapshot(&self, source: TableId) -> Result<SnapshotId>;

	/// Validates `change` against the snapshot and applies it there.
	fn validate_change(&self, snapshot: SnapshotId, change: SnapshotChange<'_>) -> Result<()>;

	fn drop_snapshot(&self, snapshot: SnapshotId) -> Result<()>;
}
