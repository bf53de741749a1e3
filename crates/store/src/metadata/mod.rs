// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

mod locks;
mod transaction;

use std::{
	sync::{
		Arc,
		atomic::{AtomicU64, Ordering},
	},
	time::Duration,
};

use locks::RowLocks;
use parking_lot::Mutex;
use tablelog_core::{EncodedKey, EncodedKeyRange};
use tablelog_type::Result;
pub use transaction::CommandTransaction;

use crate::backend::{BackendStorage, PrimitiveStorage};

/// Read access shared by the store itself (committed state) and by command
/// transactions (committed state plus their own staged writes).
pub trait MetadataRead {
	fn get(&self, key: &EncodedKey) -> Result<Option<Vec<u8>>>;

	/// Entries within `range`, in key order.
	fn range(&self, range: &EncodedKeyRange) -> Result<Vec<(EncodedKey, Vec<u8>)>>;
}

/// The authoritative metadata store: versioned keys over a storage backend,
/// written through command transactions.
#[derive(Clone)]
pub struct MetadataStore(Arc<Inner>);

struct Inner {
	storage: BackendStorage,
	row_locks: RowLocks,
	commit: Mutex<()>,
	next_txn: AtomicU64,
	row_lock_timeout: Duration,
}

impl MetadataStore {
	pub fn new(storage: BackendStorage, row_lock_timeout: Duration) -> Self {
		Self(Arc::new(Inner {
			storage,
			row_locks: RowLocks::default(),
			commit: Mutex::new(()),
			next_txn: AtomicU64::new(1),
			row_lock_timeout,
		}))
	}

	pub fn memory() -> Self {
		Self::new(BackendStorage::memory(), Duration::from_secs(10))
	}

	pub fn row_lock_timeout(&self) -> Duration {
		self.0.row_lock_timeout
	}

	pub fn begin_command(&self) -> CommandTransaction {
		let id = self.0.next_txn.fetch_add(1, Ordering::Relaxed);
		CommandTransaction::new(self.clone(), id)
	}

	fn apply(&self, batch: &[(Vec<u8>, Option<Vec<u8>>)]) -> Result<()> {
		let _guard = self.0.commit.lock();
		self.0.storage.apply(batch)
	}

	fn row_locks(&self) -> &RowLocks {
		&self.0.row_locks
	}
}

impl MetadataRead for MetadataStore {
	fn get(&self, key: &EncodedKey) -> Result<Option<Vec<u8>>> {
		self.0.storage.get(key.as_slice())
	}

	fn range(&self, range: &EncodedKeyRange) -> Result<Vec<(EncodedKey, Vec<u8>)>> {
		Ok(self.0
			.storage
			.range(range.start_bound(), range.end_bound())?
			.into_iter()
			.map(|entry| (EncodedKey::new(entry.key), entry.value))
			.collect())
	}
}
