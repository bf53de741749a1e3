// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::{
	collections::HashMap,
	time::{Duration, Instant},
};

use parking_lot::{Condvar, Mutex};
use tablelog_type::{Result, diagnostic::lock::lock_timeout, return_error};

/// Exclusive per-key locks owned by metadata transactions.
#[derive(Default)]
pub(crate) struct RowLocks {
	owners: Mutex<HashMap<Vec<u8>, u64>>,
	released: Condvar,
}

impl RowLocks {
	/// Blocks until `txn` owns `key`. Re-acquiring a held key is a no-op.
	/// Returns true if the lock was newly taken.
	pub(crate) fn acquire(&self, key: &[u8], txn: u64, timeout: Duration) -> Result<bool> {
		let deadline = Instant::now() + timeout;
		let mut owners = self.owners.lock();
		loop {
			match owners.get(key) {
				None => {
					owners.insert(key.to_vec(), txn);
					return Ok(true);
				}
				Some(owner) if *owner == txn => return Ok(false),
				Some(_) => {
					if self.released.wait_until(&mut owners, deadline).timed_out() && owners.contains_key(key) {
						return_error!(lock_timeout(&format!("row:{}", hex(key)), timeout));
					}
				}
			}
		}
	}

	pub(crate) fn release_all(&self, keys: &[Vec<u8>], txn: u64) {
		if keys.is_empty() {
			return;
		}
		let mut owners = self.owners.lock();
		for key in keys {
			if owners.get(key) == Some(&txn) {
				owners.remove(key);
			}
		}
		drop(owners);
		self.released.notify_all();
	}
}

fn hex(bytes: &[u8]) -> String {
	bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
