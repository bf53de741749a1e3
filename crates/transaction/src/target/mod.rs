// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

//! Per-kind rules for which changes a table-like entity accepts.

mod entity_view;
mod materialized;
mod registry;
mod table;

pub use entity_view::EntityViewTarget;
pub use materialized::MaterializedViewTarget;
pub use registry::TargetRegistry;
pub use table::TableTarget;
use tablelog_catalog::{ChangeLogStore, validate_rows};
use tablelog_core::{
	interface::{SchemaProvider, TargetKind},
	model::{ColumnChange, ColumnModel, SchemaChangeRequest, SparseChangeSet, SparseRow, TableChange, TableChangeResult},
};
use tablelog_store::CommandTransaction;
use tablelog_type::{ColumnId, Result, TableId, UserId};

/// Collaborators a target needs while validating and applying.
pub struct TargetContext<'a> {
	pub changes: &'a ChangeLogStore,
	pub schema: &'a dyn SchemaProvider,
}

/// The state a batch of changes evolves as it is validated or applied.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchState {
	pub table: TableId,
	pub user: UserId,
	/// The schema as of the change being processed.
	pub schema: Vec<ColumnModel>,
	pub schema_changed: bool,
}

impl BatchState {
	pub fn new(table: TableId, user: UserId, schema: Vec<ColumnModel>) -> Self {
		Self {
			table,
			user,
			schema,
			schema_changed: false,
		}
	}

	pub fn column_ids(&self) -> Vec<ColumnId> {
		self.schema.iter().map(|c| c.id).collect()
	}
}

pub trait AppendableTarget: Send + Sync {
	fn kind(&self) -> TargetKind;

	fn name(&self) -> &'static str;

	/// Checks the change without writing anything. Schema changes advance the
	/// working schema in `state` so later changes are checked against it.
	fn validate(&self, ctx: &TargetContext<'_>, state: &mut BatchState, change: &TableChange) -> Result<()>;

	fn apply(
		&self,
		ctx: &TargetContext<'_>,
		txn: &mut CommandTransaction,
		state: &mut BatchState,
		change: &TableChange,
	) -> Result<TableChangeResult>;
}

/// The rows a change writes; `None` for schema changes.
pub fn rows_of(change: &TableChange) -> Result<Option<SparseChangeSet>> {
	match change {
		TableChange::AppendRows(set) => set.to_sparse().map(Some),
		TableChange::AppendPartialRows(set) => Ok(Some(set.clone())),
		TableChange::DeleteRows(selection) => Ok(Some(SparseChangeSet::new(
			selection.etag.clone(),
			selection.row_ids.iter().map(|id| SparseRow::with_id(*id, None)).collect(),
		))),
		TableChange::SchemaChange(_) => Ok(None),
	}
}

/// Resolves the schema a schema change leads to.
pub fn next_schema(
	ctx: &TargetContext<'_>,
	current: &[ColumnModel],
	request: &SchemaChangeRequest,
) -> Result<Vec<ColumnModel>> {
	let next = match &request.ordered_columns {
		Some(ordered) => ordered.clone(),
		None => {
			let ids: Vec<ColumnId> = current.iter().map(|c| c.id).collect();
			ColumnChange::apply_all(&ids, &request.changes)
		}
	};
	ctx.schema.columns(&next)
}

pub(crate) fn validate_change(ctx: &TargetContext<'_>, state: &mut BatchState, change: &TableChange) -> Result<()> {
	match change {
		TableChange::SchemaChange(request) => {
			state.schema = next_schema(ctx, &state.schema, request)?;
			state.schema_changed = true;
			Ok(())
		}
		_ => match rows_of(change)? {
			Some(rows) => validate_rows(state.table, &state.schema, &rows),
			None => Ok(()),
		},
	}
}

pub(crate) fn apply_change(
	ctx: &TargetContext<'_>,
	txn: &mut CommandTransaction,
	state: &mut BatchState,
	change: &TableChange,
) -> Result<TableChangeResult> {
	match change {
		TableChange::SchemaChange(request) => {
			let columns = next_schema(ctx, &state.schema, request)?;
			let ids = columns.iter().map(|c| c.id).collect();
			let version = ctx.changes.append_schema_change(txn, state.table, state.user, request.changes.clone(), ids)?;
			state.schema = columns.clone();
			state.schema_changed = true;
			Ok(TableChangeResult::Schema {
				version,
				columns,
			})
		}
		_ => {
			let rows = rows_of(change)?.unwrap_or_default();
			let refs = ctx.changes.append_row_change(txn, state.table, state.user, &state.schema, rows)?;
			Ok(TableChangeResult::Rows(refs))
		}
	}
}
