// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::{
	collections::HashMap,
	fmt,
	sync::Arc,
	time::{Duration, Instant},
};

use parking_lot::{Condvar, Mutex};
use tablelog_type::{Result, diagnostic::lock::lock_timeout, return_error};
use tracing::{instrument, trace};

use crate::{LockKey, LockMode, LockService};

#[derive(Debug, Default, Clone, Copy)]
struct Holders {
	writer: bool,
	readers: usize,
}

impl Holders {
	fn admits(&self, mode: LockMode) -> bool {
		match mode {
			LockMode::Exclusive => !self.writer && self.readers == 0,
			LockMode::Shared => !self.writer,
		}
	}

	fn is_free(&self) -> bool {
		!self.writer && self.readers == 0
	}
}

#[derive(Default)]
struct Inner {
	held: Mutex<HashMap<LockKey, Holders>>,
	released: Condvar,
}

/// In-process lock service.
#[derive(Clone, Default)]
pub struct MemoryLockService {
	inner: Arc<Inner>,
}

impl MemoryLockService {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_locked(&self, key: LockKey) -> bool {
		self.inner.held.lock().get(&key).map(|h| !h.is_free()).unwrap_or(false)
	}
}

impl LockService for MemoryLockService {
	#[instrument(name = "lock::acquire", level = "trace", skip(self), fields(key = %key))]
	fn acquire(&self, key: LockKey, mode: LockMode, timeout: Duration) -> Result<LockGuard> {
		let deadline = Instant::now() + timeout;
		let mut held = self.inner.held.lock();
		loop {
			let holders = held.entry(key).or_default();
			if holders.admits(mode) {
				match mode {
					LockMode::Exclusive => holders.writer = true,
					LockMode::Shared => holders.readers += 1,
				}
				trace!(?mode, "acquired");
				return Ok(LockGuard {
					inner: self.inner.clone(),
					key,
					mode,
				});
			}
			if self.inner.released.wait_until(&mut held, deadline).timed_out() {
				let admits = held.get(&key).map(|h| h.admits(mode)).unwrap_or(true);
				if !admits {
					return_error!(lock_timeout(&key.to_string(), timeout));
				}
			}
		}
	}
}

/// Holds a lock until dropped.
pub struct LockGuard {
	inner: Arc<Inner>,
	key: LockKey,
	mode: LockMode,
}

impl LockGuard {
	pub fn key(&self) -> LockKey {
		self.key
	}

	pub fn mode(&self) -> LockMode {
		self.mode
	}
}

impl fmt::Debug for LockGuard {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LockGuard").field("key", &self.key).field("mode", &self.mode).finish()
	}
}

impl Drop for LockGuard {
	fn drop(&mut self) {
		let mut held = self.inner.held.lock();
		if let Some(holders) = held.get_mut(&self.key) {
			match self.mode {
				LockMode::Exclusive => holders.writer = false,
				LockMode::Shared => holders.readers = holders.readers.saturating_sub(1),
			}
			if holders.is_free() {
				held.remove(&self.key);
			}
		}
		drop(held);
		self.inner.released.notify_all();
	}
}
