// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use tablelog_core::key::{ChangeEtagKey, ChangeKey};
use tablelog_store::CommandTransaction;
use tablelog_type::{Result, TableId, Version};
use tracing::{info, instrument};

use super::{ChangeLogStore, read};
use crate::SequenceAllocator;

impl ChangeLogStore {
	/// Tears down the table's whole history together with its sequence. Blobs
	/// are removed once the transaction commits.
	#[instrument(name = "catalog::change::delete_all", level = "debug", skip(self, txn), fields(table = %table))]
	pub fn delete_all(&self, txn: &mut CommandTransaction, table: TableId) -> Result<usize> {
		let records = read::records_after(&*txn, table, Version::NONE)?;
		for record in &records {
			txn.remove(&ChangeKey::encoded(table, record.version))?;
			txn.remove(&ChangeEtagKey::encoded(table, &record.etag))?;
			self.blobs.delete_on_commit(txn, &record.blob_key);
		}
		SequenceAllocator::delete(txn, table)?;
		info!(changes = records.len(), "deleted table history");
		Ok(records.len())
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use tablelog_core::{
		interface::BlobStore,
		model::{ColumnModel, SparseChangeSet, SparseRow},
	};
	use tablelog_store::{MemoryBlobStore, MetadataStore};
	use tablelog_type::{ColumnId, ColumnType, RowId, TableId, UserId, Version};

	use crate::{ChangeLogStore, SequenceAllocator};

	#[test]
	fn test_delete_all_clears_history_and_blobs() {
		let blobs = Arc::new(MemoryBlobStore::new());
		let log = ChangeLogStore::new(blobs.clone() as Arc<dyn BlobStore>, "tables");
		let store = MetadataStore::memory();
		let schema = vec![ColumnModel::new(1u64, "a", ColumnType::String)];

		let mut txn = store.begin_command();
		for _ in 0..3 {
			let delta = SparseChangeSet::new(None, vec![SparseRow::new().set(ColumnId(1), "x")]);
			log.append_row_change(&mut txn, TableId(1), UserId(1), &schema, delta).unwrap();
		}
		let other = SparseChangeSet::new(None, vec![SparseRow::new().set(ColumnId(1), "y")]);
		log.append_row_change(&mut txn, TableId(2), UserId(1), &schema, other).unwrap();
		txn.commit().unwrap();
		assert_eq!(blobs.len(), 4);

		let mut txn = store.begin_command();
		assert_eq!(log.delete_all(&mut txn, TableId(1)).unwrap(), 3);
		txn.commit().unwrap();

		assert!(log.list_changes(&store, TableId(1), None).unwrap().is_empty());
		assert!(SequenceAllocator::current(&store, TableId(1)).unwrap().is_none());
		assert_eq!(blobs.len(), 1);
		assert_eq!(log.get_row_set(&store, TableId(2), Version(0)).unwrap().rows[0].row_id, Some(RowId(0)));
	}
}
