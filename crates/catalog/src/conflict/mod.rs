// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::collections::HashSet;

use tablelog_core::model::{ChangeType, SparseChangeSet};
use tablelog_store::MetadataRead;
use tablelog_type::{
	Result, RowId, TableId, Version,
	diagnostic::{change::etag_not_found, conflict::row_conflict, validation::missing_row_version},
	error, return_error,
};
use tracing::{debug, instrument};

use crate::change::{ChangeBlobs, read};

/// Detects write/write conflicts at row granularity. A delta conflicts when
/// a row change committed after the caller's baseline touched one of the
/// rows the delta updates.
#[derive(Clone)]
pub struct ConflictDetector {
	blobs: ChangeBlobs,
}

impl ConflictDetector {
	pub(crate) fn new(blobs: ChangeBlobs) -> Self {
		Self {
			blobs,
		}
	}

	/// The baseline is the newest of the explicit row versions and the version
	/// named by the delta's etag.
	#[instrument(name = "catalog::conflict::check", level = "debug", skip(self, rx, delta), fields(table = %table))]
	pub fn check_for_row_level_conflict(&self, rx: &impl MetadataRead, table: TableId, delta: &SparseChangeSet) -> Result<()> {
		let etag_version = match &delta.etag {
			Some(etag) => Some(read::version_for_etag(rx, table, etag)?.ok_or_else(|| error!(etag_not_found(table, etag)))?),
			None => None,
		};

		let mut baseline = etag_version.unwrap_or(Version::NONE);
		let mut rows: HashSet<RowId> = HashSet::new();
		for row in &delta.rows {
			let Some(row_id) = row.row_id else {
				continue;
			};
			match row.version {
				Some(version) => baseline = baseline.max(version),
				None if etag_version.is_none() => return_error!(missing_row_version(row_id)),
				None => {}
			}
			rows.insert(row_id);
		}
		if rows.is_empty() {
			return Ok(());
		}

		for record in read::records_after(rx, table, baseline)? {
			if record.change_type != ChangeType::Row {
				continue;
			}
			let later: SparseChangeSet = self.blobs.load(&record)?;
			if let Some(row_id) = later.row_ids().find(|id| rows.contains(id)) {
				debug!(row = %row_id, baseline = %baseline, conflicting = %record.version, "row conflict");
				return_error!(row_conflict(row_id));
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use tablelog_core::{
		interface::BlobStore,
		model::{ColumnChange, ColumnModel, SparseChangeSet, SparseRow},
	};
	use tablelog_store::{MemoryBlobStore, MetadataStore};
	use tablelog_type::{ColumnId, ColumnType, ErrorKind, Etag, RowId, TableId, UserId, Version};

	use crate::ChangeLogStore;

	const TABLE: TableId = TableId(1);
	const USER: UserId = UserId(1);

	fn schema() -> Vec<ColumnModel> {
		vec![ColumnModel::new(1u64, "value", ColumnType::String)]
	}

	fn setup() -> (MetadataStore, ChangeLogStore) {
		let blobs: Arc<dyn BlobStore> = Arc::new(MemoryBlobStore::new());
		(MetadataStore::memory(), ChangeLogStore::new(blobs, "tables"))
	}

	fn update(etag: Option<Etag>, row: i64, version: Option<Version>, value: &str) -> SparseChangeSet {
		SparseChangeSet::new(etag, vec![SparseRow::with_id(RowId(row), version).set(ColumnId(1), value)])
	}

	#[test]
	fn test_stale_etag_conflicts() {
		let (store, log) = setup();

		let mut txn = store.begin_command();
		let initial = SparseChangeSet::new(None, (0..5).map(|i| SparseRow::new().set(ColumnId(1), i.to_string())).collect());
		log.append_row_change(&mut txn, TABLE, USER, &schema(), initial).unwrap();
		txn.commit().unwrap();
		let etag = log.get_change(&store, TABLE, Version(0)).unwrap().etag;

		let mut txn = store.begin_command();
		let refs = log.append_row_change(&mut txn, TABLE, USER, &schema(), update(Some(etag.clone()), 2, None, "a")).unwrap();
		txn.commit().unwrap();
		assert_eq!(refs[0].version, Version(1));

		let mut txn = store.begin_command();
		let err = log.append_row_change(&mut txn, TABLE, USER, &schema(), update(Some(etag), 2, None, "b")).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Conflict);
		assert!(err.diagnostic().message.contains("row id 2"));
	}

	#[test]
	fn test_disjoint_rows_do_not_conflict() {
		let (store, log) = setup();
		let mut txn = store.begin_command();
		let initial = SparseChangeSet::new(None, (0..3).map(|_| SparseRow::new().set(ColumnId(1), "x")).collect());
		log.append_row_change(&mut txn, TABLE, USER, &schema(), initial).unwrap();
		log.append_row_change(&mut txn, TABLE, USER, &schema(), update(None, 0, Some(Version(0)), "y")).unwrap();
		txn.commit().unwrap();

		let delta = update(None, 1, Some(Version(0)), "z");
		log.conflict_detector().check_for_row_level_conflict(&store, TABLE, &delta).unwrap();

		let delta = update(None, 0, Some(Version(0)), "z");
		let err = log.conflict_detector().check_for_row_level_conflict(&store, TABLE, &delta).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Conflict);
	}

	#[test]
	fn test_newer_row_version_raises_baseline() {
		let (store, log) = setup();
		let mut txn = store.begin_command();
		let initial = SparseChangeSet::new(None, vec![SparseRow::new().set(ColumnId(1), "x")]);
		log.append_row_change(&mut txn, TABLE, USER, &schema(), initial).unwrap();
		log.append_row_change(&mut txn, TABLE, USER, &schema(), update(None, 0, Some(Version(0)), "y")).unwrap();
		txn.commit().unwrap();

		let delta = update(None, 0, Some(Version(1)), "z");
		log.conflict_detector().check_for_row_level_conflict(&store, TABLE, &delta).unwrap();
	}

	#[test]
	fn test_schema_changes_never_conflict() {
		let (store, log) = setup();
		let mut txn = store.begin_command();
		let initial = SparseChangeSet::new(None, vec![SparseRow::new().set(ColumnId(1), "x")]);
		log.append_row_change(&mut txn, TABLE, USER, &schema(), initial).unwrap();
		log.append_schema_change(&mut txn, TABLE, USER, vec![ColumnChange::add(ColumnId(2))], vec![ColumnId(1), ColumnId(2)])
			.unwrap();
		txn.commit().unwrap();

		let delta = update(None, 0, Some(Version(0)), "y");
		log.conflict_detector().check_for_row_level_conflict(&store, TABLE, &delta).unwrap();
	}

	#[test]
	fn test_unknown_etag() {
		let (store, log) = setup();
		let delta = update(Some(Etag::from("nope")), 0, None, "x");
		let err = log.conflict_detector().check_for_row_level_conflict(&store, TABLE, &delta).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::NotFound);
	}

	#[test]
	fn test_row_without_version_or_etag() {
		let (store, log) = setup();
		let delta = update(None, 0, None, "x");
		let err = log.conflict_detector().check_for_row_level_conflict(&store, TABLE, &delta).unwrap_err();
		assert_eq!(err.code(), "VAL_004");
	}
}
