// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use tablelog_core::{EncodedKey, EncodedKeyRange, interface::BlobStore};
use tablelog_type::{Result, diagnostic::store::transaction_finished, return_error};
use tracing::{debug, instrument, warn};

use super::{MetadataRead, MetadataStore};

struct TrackedBlob {
	blobs: Arc<dyn BlobStore>,
	bucket: String,
	key: String,
}

impl TrackedBlob {
	fn delete(self) {
		if let Err(err) = self.blobs.delete(&self.bucket, &self.key) {
			warn!(bucket = %self.bucket, key = %self.key, error = %err, "failed to delete blob");
		}
	}
}

/// A read-write metadata transaction.
///
/// Writes are staged and become visible to other readers on [`commit`];
/// reads through the transaction see its own staged writes. Row locks taken
/// with [`get_for_update`] are held until commit or rollback. Dropping an
/// unfinished transaction rolls it back.
///
/// [`commit`]: CommandTransaction::commit
/// [`get_for_update`]: CommandTransaction::get_for_update
pub struct CommandTransaction {
	store: MetadataStore,
	id: u64,
	pending: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
	locked: Vec<Vec<u8>>,
	orphans: Vec<TrackedBlob>,
	doomed: Vec<TrackedBlob>,
	done: bool,
}

impl CommandTransaction {
	pub(super) fn new(store: MetadataStore, id: u64) -> Self {
		Self {
			store,
			id,
			pending: BTreeMap::new(),
			locked: Vec::new(),
			orphans: Vec::new(),
			doomed: Vec::new(),
			done: false,
		}
	}

	pub fn id(&self) -> u64 {
		self.id
	}

	fn check_active(&self) -> Result<()> {
		if self.done {
			return_error!(transaction_finished());
		}
		Ok(())
	}

	/// Locks `key` for this transaction, then reads it.
	pub fn get_for_update(&mut self, key: &EncodedKey) -> Result<Option<Vec<u8>>> {
		let timeout = self.store.row_lock_timeout();
		self.get_for_update_within(key, timeout)
	}

	pub fn get_for_update_within(&mut self, key: &EncodedKey, timeout: Duration) -> Result<Option<Vec<u8>>> {
		self.check_active()?;
		if self.store.row_locks().acquire(key.as_slice(), self.id, timeout)? {
			self.locked.push(key.as_slice().to_vec());
		}
		self.get(key)
	}

	pub fn set(&mut self, key: &EncodedKey, value: Vec<u8>) -> Result<()> {
		self.check_active()?;
		self.pending.insert(key.as_slice().to_vec(), Some(value));
		Ok(())
	}

	pub fn remove(&mut self, key: &EncodedKey) -> Result<()> {
		self.check_active()?;
		self.pending.insert(key.as_slice().to_vec(), None);
		Ok(())
	}

	/// Removes every key within `range`.
	pub fn remove_range(&mut self, range: &EncodedKeyRange) -> Result<usize> {
		let keys: Vec<EncodedKey> = self.range(range)?.into_iter().map(|(key, _)| key).collect();
		for key in &keys {
			self.remove(key)?;
		}
		Ok(keys.len())
	}

	/// Records a blob written on behalf of this transaction; it is deleted if
	/// the transaction rolls back.
	pub fn track_blob(&mut self, blobs: Arc<dyn BlobStore>, bucket: &str, key: &str) {
		self.orphans.push(TrackedBlob {
			blobs,
			bucket: bucket.to_string(),
			key: key.to_string(),
		});
	}

	/// Schedules a blob for deletion once this transaction commits.
	pub fn delete_blob_on_commit(&mut self, blobs: Arc<dyn BlobStore>, bucket: &str, key: &str) {
		self.doomed.push(TrackedBlob {
			blobs,
			bucket: bucket.to_string(),
			key: key.to_string(),
		});
	}

	#[instrument(name = "store::transaction::commit", level = "debug", skip(self), fields(txn = self.id, writes = self.pending.len()))]
	pub fn commit(mut self) -> Result<()> {
		self.check_active()?;
		let batch: Vec<(Vec<u8>, Option<Vec<u8>>)> = std::mem::take(&mut self.pending).into_iter().collect();
		match self.store.apply(&batch) {
			Ok(()) => {
				self.orphans.clear();
				self.finish();
				for blob in self.doomed.drain(..) {
					blob.delete();
				}
				Ok(())
			}
			Err(err) => {
				self.rollback_inner();
				Err(err)
			}
		}
	}

	#[instrument(name = "store::transaction::rollback", level = "debug", skip(self), fields(txn = self.id))]
	pub fn rollback(mut self) -> Result<()> {
		self.check_active()?;
		self.rollback_inner();
		Ok(())
	}

	fn rollback_inner(&mut self) {
		self.pending.clear();
		self.doomed.clear();
		for orphan in self.orphans.drain(..) {
			debug!(bucket = %orphan.bucket, key = %orphan.key, "deleting orphan blob");
			orphan.delete();
		}
		self.finish();
	}

	fn finish(&mut self) {
		self.store.row_locks().release_all(&self.locked, self.id);
		self.locked.clear();
		self.done = true;
	}
}

impl MetadataRead for CommandTransaction {
	fn get(&self, key: &EncodedKey) -> Result<Option<Vec<u8>>> {
		self.check_active()?;
		if let Some(staged) = self.pending.get(key.as_slice()) {
			return Ok(staged.clone());
		}
		self.store.get(key)
	}

	fn range(&self, range: &EncodedKeyRange) -> Result<Vec<(EncodedKey, Vec<u8>)>> {
		self.check_active()?;
		let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
			self.store.range(range)?.into_iter().map(|(key, value)| (key.0, value)).collect();

		let staged = self.pending.range::<[u8], _>((range.start_bound(), range.end_bound()));
		for (key, value) in staged {
			match value {
				Some(value) => {
					merged.insert(key.clone(), value.clone());
				}
				None => {
					merged.remove(key);
				}
			}
		}
		Ok(merged.into_iter().map(|(key, value)| (EncodedKey::new(key), value)).collect())
	}
}

impl Drop for CommandTransaction {
	fn drop(&mut self) {
		if !self.done {
			self.rollback_inner();
		}
	}
}
