// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use tablelog_core::{
	interface::TargetKind,
	model::{TableChange, TableChangeResult},
};
use tablelog_store::CommandTransaction;
use tablelog_type::{Result, diagnostic::validation::change_not_supported, return_error};

use super::{AppendableTarget, BatchState, TargetContext, apply_change, rows_of, validate_change};

/// A view over existing entities: its rows may be updated and its schema
/// changed, but it never gains or loses rows through a transaction.
pub struct EntityViewTarget;

impl EntityViewTarget {
	fn check(&self, state: &BatchState, change: &TableChange) -> Result<()> {
		match change {
			TableChange::DeleteRows(_) => {
				return_error!(change_not_supported(state.table, self.name(), change.name()));
			}
			TableChange::SchemaChange(_) => Ok(()),
			_ => {
				let rows = rows_of(change)?.unwrap_or_default();
				if rows.rows.iter().any(|row| row.row_id.is_none() || row.is_delete()) {
					return_error!(change_not_supported(state.table, self.name(), "row creation or deletion"));
				}
				Ok(())
			}
		}
	}
}

impl AppendableTarget for EntityViewTarget {
	fn kind(&self) -> TargetKind {
		TargetKind::EntityView
	}

	fn name(&self) -> &'static str {
		"entity view"
	}

	fn validate(&self, ctx: &TargetContext<'_>, state: &mut BatchState, change: &TableChange) -> Result<()> {
		self.check(state, change)?;
		validate_change(ctx, state, change)
	}

	fn apply(
		&self,
		ctx: &TargetContext<'_>,
		txn: &mut CommandTransaction,
		state: &mut BatchState,
		change: &TableChange,
	) -> Result<TableChangeResult> {
		self.check(state, change)?;
		apply_change(ctx, txn, state, change)
	}
}
