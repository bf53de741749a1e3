// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use tablelog_core::{
	encoded::encode_value,
	key::{ChangeEtagKey, ChangeKey},
	model::{ChangeRecord, ChangeType, ColumnChange, ColumnModel, RowIdRange, RowReference, SchemaChangeSet, SparseChangeSet},
	util::now_millis,
};
use tablelog_store::CommandTransaction;
use tablelog_type::{ColumnId, Result, TableId, UserId, Version, diagnostic::validation::row_id_not_issued, return_error};
use tracing::{debug, instrument};

use super::ChangeLogStore;
use crate::{SequenceAllocator, validate_rows};

impl ChangeLogStore {
	/// Appends a row change. Rows without an id are new and receive freshly
	/// issued ids; rows with an id update or (with no values) delete an
	/// existing row and are checked for conflicts against the caller's
	/// baseline. Every row is stamped with the new version.
	#[instrument(name = "catalog::change::append_rows", level = "debug", skip(self, txn, schema, delta), fields(table = %table, rows = delta.rows.len()))]
	pub fn append_row_change(
		&self,
		txn: &mut CommandTransaction,
		table: TableId,
		user: UserId,
		schema: &[ColumnModel],
		mut delta: SparseChangeSet,
	) -> Result<Vec<RowReference>> {
		validate_rows(table, schema, &delta)?;

		let new_rows = delta.new_row_count() as u64;
		let range = SequenceAllocator::reserve(txn, table, new_rows)?;

		for row_id in delta.row_ids() {
			if row_id.0 < 0 || row_id > range.max_update_id {
				return_error!(row_id_not_issued(table, row_id, range.max_update_id));
			}
		}

		if delta.row_count() as u64 > new_rows {
			self.detector.check_for_row_level_conflict(&*txn, table, &delta)?;
		}

		stamp(&mut delta, &range);

		let blob_key = self.blobs.put(txn, table, &delta)?;
		let record = ChangeRecord {
			table,
			version: range.version,
			etag: range.etag.clone(),
			change_type: ChangeType::Row,
			created_by: user,
			created_on: now_millis(),
			blob_key,
			row_count: delta.rows.len() as u64,
		};
		write_record(txn, &record)?;

		debug!(version = %range.version, new_rows, "appended row change");
		Ok(delta
			.rows
			.iter()
			.filter_map(|row| {
				row.row_id.map(|row_id| RowReference {
					row_id,
					version: range.version,
				})
			})
			.collect())
	}

	/// Appends a column change: the edits applied and the resulting ordered
	/// column list. Consumes exactly one version and no row ids.
	#[instrument(name = "catalog::change::append_schema", level = "debug", skip(self, txn, changes, columns), fields(table = %table))]
	pub fn append_schema_change(
		&self,
		txn: &mut CommandTransaction,
		table: TableId,
		user: UserId,
		changes: Vec<ColumnChange>,
		columns: Vec<ColumnId>,
	) -> Result<Version> {
		let range = SequenceAllocator::reserve(txn, table, 0)?;
		let payload = SchemaChangeSet {
			changes,
			columns,
		};
		let blob_key = self.blobs.put(txn, table, &payload)?;
		let record = ChangeRecord {
			table,
			version: range.version,
			etag: range.etag.clone(),
			change_type: ChangeType::Column,
			created_by: user,
			created_on: now_millis(),
			blob_key,
			row_count: 0,
		};
		write_record(txn, &record)?;

		debug!(version = %range.version, "appended schema change");
		Ok(range.version)
	}
}

fn stamp(delta: &mut SparseChangeSet, range: &RowIdRange) {
	delta.etag = Some(range.etag.clone());
	let mut fresh = range.ids();
	for row in &mut delta.rows {
		if row.row_id.is_none() {
			row.row_id = fresh.next();
		}
		row.version = Some(range.version);
	}
}

fn write_record(txn: &mut CommandTransaction, record: &ChangeRecord) -> Result<()> {
	txn.set(&ChangeKey::encoded(record.table, record.version), encode_value(record)?)?;
	txn.set(&ChangeEtagKey::encoded(record.table, &record.etag), encode_value(&record.version)?)
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use tablelog_core::{
		interface::BlobStore,
		model::{ChangeType, ColumnChange, ColumnModel, SparseChangeSet, SparseRow},
	};
	use tablelog_store::{MemoryBlobStore, MetadataStore};
	use tablelog_type::{ColumnId, ColumnType, ErrorKind, RowId, TableId, UserId, Version};

	use crate::ChangeLogStore;

	const TABLE: TableId = TableId(1);
	const USER: UserId = UserId(7);

	fn schema() -> Vec<ColumnModel> {
		vec![ColumnModel::new(1u64, "name", ColumnType::String), ColumnModel::new(2u64, "count", ColumnType::Integer)]
	}

	fn setup() -> (MetadataStore, Arc<MemoryBlobStore>, ChangeLogStore) {
		let blobs = Arc::new(MemoryBlobStore::new());
		let log = ChangeLogStore::new(blobs.clone() as Arc<dyn BlobStore>, "tables");
		(MetadataStore::memory(), blobs, log)
	}

	fn new_rows(n: usize) -> SparseChangeSet {
		SparseChangeSet::new(
			None,
			(0..n).map(|i| SparseRow::new().set(ColumnId(1), format!("row{}", i)).set(ColumnId(2), i.to_string())).collect(),
		)
	}

	#[test]
	fn test_append_then_read_back() {
		let (store, _, log) = setup();
		let mut txn = store.begin_command();
		let refs = log.append_row_change(&mut txn, TABLE, USER, &schema(), new_rows(3)).unwrap();
		txn.commit().unwrap();

		assert_eq!(refs.iter().map(|r| r.row_id).collect::<Vec<_>>(), vec![RowId(0), RowId(1), RowId(2)]);
		assert!(refs.iter().all(|r| r.version == Version(0)));

		let record = log.get_change(&store, TABLE, Version(0)).unwrap();
		assert_eq!(record.change_type, ChangeType::Row);
		assert_eq!(record.row_count, 3);
		assert_eq!(record.created_by, USER);

		let set = log.get_row_set(&store, TABLE, Version(0)).unwrap();
		assert_eq!(set.etag, Some(record.etag.clone()));
		assert_eq!(set.rows[1].row_id, Some(RowId(1)));
		assert_eq!(set.rows[1].version, Some(Version(0)));
		assert_eq!(set.rows[1].values.get(&ColumnId(1)), Some(&Some("row1".to_string())));
		assert_eq!(log.version_for_etag(&store, TABLE, &record.etag).unwrap(), Version(0));
	}

	#[test]
	fn test_unknown_column_rejected_before_reserving() {
		let (store, blobs, log) = setup();
		let mut txn = store.begin_command();
		let delta = SparseChangeSet::new(None, vec![SparseRow::new().set(ColumnId(99), "x")]);
		let err = log.append_row_change(&mut txn, TABLE, USER, &schema(), delta).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Validation);
		txn.commit().unwrap();
		assert!(log.last_change(&store, TABLE).unwrap().is_none());
		assert!(blobs.is_empty());
	}

	#[test]
	fn test_never_issued_row_id_rejected() {
		let (store, _, log) = setup();
		let mut txn = store.begin_command();
		log.append_row_change(&mut txn, TABLE, USER, &schema(), new_rows(2)).unwrap();
		let delta = SparseChangeSet::new(None, vec![SparseRow::with_id(RowId(5), Some(Version(0))).set(ColumnId(1), "x")]);
		let err = log.append_row_change(&mut txn, TABLE, USER, &schema(), delta).unwrap_err();
		assert_eq!(err.code(), "VAL_003");
	}

	#[test]
	fn test_rollback_removes_blob() {
		let (store, blobs, log) = setup();
		let mut txn = store.begin_command();
		log.append_row_change(&mut txn, TABLE, USER, &schema(), new_rows(2)).unwrap();
		assert_eq!(blobs.len(), 1);
		txn.rollback().unwrap();
		assert!(blobs.is_empty());
		assert!(log.list_changes(&store, TABLE, None).unwrap().is_empty());
	}

	#[test]
	fn test_schema_change() {
		let (store, _, log) = setup();
		let mut txn = store.begin_command();
		log.append_row_change(&mut txn, TABLE, USER, &schema(), new_rows(1)).unwrap();
		let version = log
			.append_schema_change(
				&mut txn,
				TABLE,
				USER,
				vec![ColumnChange::add(ColumnId(3))],
				vec![ColumnId(1), ColumnId(2), ColumnId(3)],
			)
			.unwrap();
		txn.commit().unwrap();

		assert_eq!(version, Version(1));
		let change = log.get_schema_change(&store, TABLE, version).unwrap();
		assert_eq!(change.columns, vec![ColumnId(1), ColumnId(2), ColumnId(3)]);
		assert_eq!(log.get_change(&store, TABLE, version).unwrap().row_count, 0);

		let err = log.get_row_set(&store, TABLE, version).unwrap_err();
		assert_eq!(err.code(), "CHG_003");
		assert_eq!(log.last_change(&store, TABLE).unwrap().unwrap().version, Version(1));
	}

	#[test]
	fn test_list_changes_since() {
		let (store, _, log) = setup();
		let mut txn = store.begin_command();
		for _ in 0..4 {
			log.append_row_change(&mut txn, TABLE, USER, &schema(), new_rows(1)).unwrap();
		}
		log.append_row_change(&mut txn, TableId(2), USER, &schema(), new_rows(1)).unwrap();
		txn.commit().unwrap();

		let all = log.list_changes(&store, TABLE, None).unwrap();
		assert_eq!(all.iter().map(|c| c.version).collect::<Vec<_>>(), (0..4).map(Version).collect::<Vec<_>>());
		let later = log.list_changes(&store, TABLE, Some(Version(1))).unwrap();
		assert_eq!(later.iter().map(|c| c.version).collect::<Vec<_>>(), vec![Version(2), Version(3)]);
	}

	#[test]
	fn test_missing_change() {
		let (store, _, log) = setup();
		let err = log.get_change(&store, TABLE, Version(3)).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::NotFound);
	}
}
