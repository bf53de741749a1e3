// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

//! Named exclusive/shared locks with bounded waits.
//!
//! A [`LockKey::Table`] lock serializes transactions on one table. A
//! [`LockKey::Index`] lock is taken exclusively while a table or view index is
//! rebuilt and shared by views reading it as a dependency.

mod config;
mod memory;

use std::{
	fmt::{Display, Formatter},
	time::Duration,
};

pub use config::LockConfig;
pub use memory::{LockGuard, MemoryLockService};
use tablelog_type::{Result, TableId};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LockKey {
	Table(TableId),
	Index(TableId),
}

impl Display for LockKey {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			LockKey::Table(table) => write!(f, "table:{}", table),
			LockKey::Index(target) => write!(f, "index:{}", target),
		}
	}
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LockMode {
	Exclusive,
	Shared,
}

pub trait LockService: Send + Sync {
	/// Blocks until the lock is held or `timeout` elapses, in which case a
	/// retryable `LockUnavailable` error is returned.
	fn acquire(&self, key: LockKey, mode: LockMode, timeout: Duration) -> Result<LockGuard>;

	fn exclusive(&self, key: LockKey, timeout: Duration) -> Result<LockGuard> {
		self.acquire(key, LockMode::Exclusive, timeout)
	}

	fn shared(&self, key: LockKey, timeout: Duration) -> Result<LockGuard> {
		self.acquire(key, LockMode::Shared, timeout)
	}
}
