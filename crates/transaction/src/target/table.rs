// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use tablelog_core::{
	interface::TargetKind,
	model::{TableChange, TableChangeResult},
};
use tablelog_store::CommandTransaction;
use tablelog_type::Result;

use super::{AppendableTarget, BatchState, TargetContext, apply_change, validate_change};

/// A plain table accepts every kind of change.
pub struct TableTarget;

impl AppendableTarget for TableTarget {
	fn kind(&self) -> TargetKind {
		TargetKind::Table
	}

	fn name(&self) -> &'static str {
		"table"
	}

	fn validate(&self, ctx: &TargetContext<'_>, state: &mut BatchState, change: &TableChange) -> Result<()> {
		validate_change(ctx, state, change)
	}

	fn apply(
		&self,
		ctx: &TargetContext<'_>,
		txn: &mut CommandTransaction,
		state: &mut BatchState,
		change: &TableChange,
	) -> Result<TableChangeResult> {
		apply_change(ctx, txn, state, change)
	}
}
