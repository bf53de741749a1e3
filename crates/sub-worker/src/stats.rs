// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters of a worker pool at one point in time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct PoolStats {
	pub submitted: u64,
	pub completed: u64,
	pub failed: u64,
	pub retried: u64,
}

#[derive(Default)]
pub(crate) struct Counters {
	pub submitted: AtomicU64,
	pub completed: AtomicU64,
	pub failed: AtomicU64,
	pub retried: AtomicU64,
}

impl Counters {
	pub fn snapshot(&self) -> PoolStats {
		PoolStats {
			submitted: self.submitted.load(Ordering::Relaxed),
			completed: self.completed.load(Ordering::Relaxed),
			failed: self.failed.load(Ordering::Relaxed),
			retried: self.retried.load(Ordering::Relaxed),
		}
	}

	pub fn incr(counter: &AtomicU64) {
		counter.fetch_add(1, Ordering::Relaxed);
	}
}
