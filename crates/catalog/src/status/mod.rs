// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use tablelog_core::{
	encoded::{decode_value, encode_value},
	key::IndexStatusKey,
	model::{IndexState, IndexStatus},
	util::now_millis,
};
use tablelog_store::{CommandTransaction, MetadataRead};
use tablelog_type::{Result, TableId};
use tracing::debug;

/// Build status of table and view indexes.
pub struct StatusCatalog;

impl StatusCatalog {
	pub fn get(rx: &impl MetadataRead, target: TableId) -> Result<Option<IndexStatus>> {
		match rx.get(&IndexStatusKey::encoded(target))? {
			Some(bytes) => Ok(Some(decode_value(&bytes)?)),
			None => Ok(None),
		}
	}

	/// Reads the status and holds its row lock until `txn` finishes.
	pub fn get_for_update(txn: &mut CommandTransaction, target: TableId) -> Result<Option<IndexStatus>> {
		match txn.get_for_update(&IndexStatusKey::encoded(target))? {
			Some(bytes) => Ok(Some(decode_value(&bytes)?)),
			None => Ok(None),
		}
	}

	pub fn set(txn: &mut CommandTransaction, status: &IndexStatus) -> Result<()> {
		txn.set(&IndexStatusKey::encoded(status.target), encode_value(status)?)
	}

	pub fn delete(txn: &mut CommandTransaction, target: TableId) -> Result<()> {
		txn.remove(&IndexStatusKey::encoded(target))
	}

	/// Moves the target to `state`, creating a pending status first if none
	/// exists. Checksums and the applied version are kept. The status row
	/// stays locked until `txn` finishes.
	pub fn mark(
		txn: &mut CommandTransaction,
		target: TableId,
		state: IndexState,
		diagnostic: Option<String>,
	) -> Result<IndexStatus> {
		let now = now_millis();
		let mut status = Self::get_for_update(txn, target)?.unwrap_or_else(|| IndexStatus::pending(target, now));
		debug!(target = %target, from = %status.state, to = %state, "index status transition");
		status.state = state;
		status.diagnostic = diagnostic;
		status.changed_on = now;
		Self::set(txn, &status)?;
		Ok(status)
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use tablelog_core::model::IndexState;
	use tablelog_store::{BackendStorage, MetadataStore};
	use tablelog_type::{ErrorKind, TableId, Version};

	use super::StatusCatalog;

	#[test]
	fn test_mark_creates_and_transitions() {
		let store = MetadataStore::memory();
		let mut txn = store.begin_command();
		let status = StatusCatalog::mark(&mut txn, TableId(5), IndexState::Processing, None).unwrap();
		assert_eq!(status.state, IndexState::Processing);
		assert_eq!(status.applied_version, Version::NONE);

		let mut available = status.clone();
		available.state = IndexState::Available;
		available.schema_checksum = Some(1);
		StatusCatalog::set(&mut txn, &available).unwrap();

		let failed = StatusCatalog::mark(&mut txn, TableId(5), IndexState::Failed, Some("boom".into())).unwrap();
		assert_eq!(failed.schema_checksum, Some(1));
		txn.commit().unwrap();

		let stored = StatusCatalog::get(&store, TableId(5)).unwrap().unwrap();
		assert_eq!(stored.state, IndexState::Failed);
		assert_eq!(stored.diagnostic.as_deref(), Some("boom"));
	}

	#[test]
	fn test_delete() {
		let store = MetadataStore::memory();
		let mut txn = store.begin_command();
		StatusCatalog::mark(&mut txn, TableId(5), IndexState::Pending, None).unwrap();
		StatusCatalog::delete(&mut txn, TableId(5)).unwrap();
		txn.commit().unwrap();
		assert!(StatusCatalog::get(&store, TableId(5)).unwrap().is_none());
	}

	#[test]
	fn test_mark_waits_for_status_row_lock() {
		let store = MetadataStore::new(BackendStorage::memory(), Duration::from_millis(30));
		let mut holder = store.begin_command();
		StatusCatalog::get_for_update(&mut holder, TableId(5)).unwrap();

		let mut txn = store.begin_command();
		let err = StatusCatalog::mark(&mut txn, TableId(5), IndexState::Processing, None).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::LockUnavailable);
		drop(txn);

		holder.commit().unwrap();
		let mut txn = store.begin_command();
		StatusCatalog::mark(&mut txn, TableId(5), IndexState::Processing, None).unwrap();
		txn.commit().unwrap();
	}
}
