// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::fmt::{Display, Formatter};

use tablelog_type::{Result, TableId};

/// Work scheduled when a table or view index needs to catch up.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RebuildJob {
	TableIndex(TableId),
	ViewIndex(TableId),
}

impl RebuildJob {
	pub fn target(&self) -> TableId {
		match self {
			RebuildJob::TableIndex(table) => *table,
			RebuildJob::ViewIndex(view) => *view,
		}
	}
}

impl Display for RebuildJob {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			RebuildJob::TableIndex(table) => write!(f, "table-index:{}", table),
			RebuildJob::ViewIndex(view) => write!(f, "view-index:{}", view),
		}
	}
}

/// Enqueues rebuild jobs; implemented by the worker pool.
pub trait RebuildTrigger: Send + Sync {
	fn trigger(&self, job: RebuildJob) -> Result<()>;
}

/// Runs one rebuild job to completion on the calling thread.
pub trait JobExecutor: Send + Sync {
	fn execute(&self, job: &RebuildJob) -> Result<()>;
}
