// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use parking_lot::Mutex;
use tablelog_core::interface::{RebuildJob, RebuildTrigger};
use tablelog_type::Result;

/// Records triggered jobs instead of running them.
#[derive(Default)]
pub struct RecordingTrigger {
	jobs: Mutex<Vec<RebuildJob>>,
}

impl RecordingTrigger {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn jobs(&self) -> Vec<RebuildJob> {
		self.jobs.lock().clone()
	}

	pub fn take(&self) -> Vec<RebuildJob> {
		std::mem::take(&mut *self.jobs.lock())
	}
}

impl RebuildTrigger for RecordingTrigger {
	fn trigger(&self, job: RebuildJob) -> Result<()> {
		self.jobs.lock().push(job);
		Ok(())
	}
}
