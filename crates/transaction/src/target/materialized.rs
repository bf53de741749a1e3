// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use tablelog_core::{
	interface::TargetKind,
	model::{TableChange, TableChangeResult},
};
use tablelog_store::CommandTransaction;
use tablelog_type::{Result, diagnostic::validation::change_not_supported, return_error};

use super::{AppendableTarget, BatchState, TargetContext};

/// Materialized views are derived from their defining query and reject
/// every direct change.
pub struct MaterializedViewTarget;

impl AppendableTarget for MaterializedViewTarget {
	fn kind(&self) -> TargetKind {
		TargetKind::MaterializedView
	}

	fn name(&self) -> &'static str {
		"materialized view"
	}

	fn validate(&self, _ctx: &TargetContext<'_>, state: &mut BatchState, change: &TableChange) -> Result<()> {
		return_error!(change_not_supported(state.table, self.name(), change.name()));
	}

	fn apply(
		&self,
		_ctx: &TargetContext<'_>,
		_txn: &mut CommandTransaction,
		state: &mut BatchState,
		change: &TableChange,
	) -> Result<TableChangeResult> {
		return_error!(change_not_supported(state.table, self.name(), change.name()));
	}
}
