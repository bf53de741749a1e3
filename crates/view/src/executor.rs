// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::sync::Arc;

use tablelog_core::interface::{JobExecutor, RebuildJob};
use tablelog_type::Result;

use crate::{TableIndexUpdater, ViewBuilder};

/// Dispatches rebuild jobs to the table index updater or the view builder.
pub struct RebuildExecutor {
	tables: Arc<TableIndexUpdater>,
	views: Arc<ViewBuilder>,
}

impl RebuildExecutor {
	pub fn new(tables: Arc<TableIndexUpdater>, views: Arc<ViewBuilder>) -> Self {
		Self {
			tables,
			views,
		}
	}
}

impl JobExecutor for RebuildExecutor {
	fn execute(&self, job: &RebuildJob) -> Result<()> {
		match job {
			RebuildJob::TableIndex(table) => self.tables.update_table_index(*table).map(|_| ()),
			RebuildJob::ViewIndex(view) => self.views.create_or_update_view_index(*view).map(|_| ()),
		}
	}
}
