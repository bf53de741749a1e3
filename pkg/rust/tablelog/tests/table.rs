// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

mod common;

use std::sync::Arc;

use common::*;
use tablelog::{
	ErrorKind, RowId, Version,
	core::model::{
		ChangeType, ColumnChange, IndexState, RowReference, SchemaChangeRequest, SparseChangeSet, SparseRow, TableChange,
		TableChangeResult,
	},
};
use tablelog_testing::DenyAll;

#[test]
fn test_append_then_stale_update_conflicts() {
	let f = fixture();

	let refs = f.service.append_rows(USER, TABLE, rows(&["a", "b", "c", "d", "e"])).unwrap();
	assert_eq!(refs.iter().map(|r| r.row_id).collect::<Vec<_>>(), (0..5).map(RowId).collect::<Vec<_>>());
	assert!(refs.iter().all(|r| r.version == Version(0)));

	let first = f.service.get_change_for_version(TABLE, Version(0)).unwrap();
	assert_eq!(first.change_type, ChangeType::Row);
	assert_eq!(first.row_count, 5);
	assert_eq!(first.created_by, USER);

	let update = SparseChangeSet::new(Some(first.etag.clone()), vec![SparseRow::with_id(RowId(2), None).set(NAME, "renamed")]);
	let refs = f.service.append_partial_rows(USER, TABLE, update.clone()).unwrap();
	assert_eq!(
		refs,
		vec![RowReference {
			row_id: RowId(2),
			version: Version(1),
		}]
	);

	let err = f.service.append_partial_rows(USER, TABLE, update).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Conflict);
	assert!(!err.is_retryable());
	assert_eq!(f.service.list_changes(TABLE, None).unwrap().len(), 2);
}

#[test]
fn test_disjoint_update_from_old_etag_succeeds() {
	let f = fixture();
	f.service.append_rows(USER, TABLE, rows(&["a", "b", "c"])).unwrap();
	let etag = f.service.get_change_for_version(TABLE, Version(0)).unwrap().etag;

	let touch = |row: i64| SparseChangeSet::new(Some(etag.clone()), vec![SparseRow::with_id(RowId(row), None).set(NAME, "x")]);
	f.service.append_partial_rows(USER, TABLE, touch(0)).unwrap();
	let refs = f.service.append_partial_rows(USER, TABLE, touch(1)).unwrap();
	assert_eq!(refs[0].version, Version(2));
}

#[test]
fn test_row_set_keeps_ids_versions_and_values() {
	let f = fixture();
	f.service.append_rows(USER, TABLE, rows(&["alpha", "beta"])).unwrap();

	let set = f.service.get_row_set(TABLE, Version(0)).unwrap();
	let record = f.service.get_change_for_version(TABLE, Version(0)).unwrap();
	assert_eq!(set.etag, Some(record.etag.clone()));
	assert_eq!(set.rows.len(), 2);
	assert_eq!(set.rows[0].row_id, Some(RowId(0)));
	assert_eq!(set.rows[1].row_id, Some(RowId(1)));
	assert!(set.rows.iter().all(|row| row.version == Some(Version(0))));
	assert_eq!(set.rows[1].values[&NAME], Some("beta".to_string()));

	assert_eq!(f.service.version_for_etag(TABLE, &record.etag).unwrap(), Version(0));
	assert_eq!(f.service.get_schema_change(TABLE, Version(0)).unwrap_err().kind(), ErrorKind::Validation);
}

#[test]
fn test_delete_rows_and_list_since() {
	let f = fixture();
	f.service.append_rows(USER, TABLE, rows(&["a", "b", "c"])).unwrap();
	let etag = f.service.last_change(TABLE).unwrap().unwrap().etag;

	let refs = f.service.delete_rows(USER, TABLE, etag, vec![RowId(1)]).unwrap();
	assert_eq!(refs[0].version, Version(1));

	let since = f.service.list_changes(TABLE, Some(Version(0))).unwrap();
	assert_eq!(since.len(), 1);
	assert_eq!(since[0].version, Version(1));
	assert_eq!(f.service.last_change(TABLE).unwrap().unwrap().version, Version(1));

	wait_available(&f, TABLE);
	assert_eq!(f.index.row_count(TABLE), Some(2));
}

#[test]
fn test_schema_change_binds_new_columns() {
	let f = fixture();

	let (version, columns) = f
		.service
		.append_schema_change(
			USER,
			TABLE,
			SchemaChangeRequest {
				changes: vec![ColumnChange::add(AGE)],
				ordered_columns: None,
			},
		)
		.unwrap();
	assert_eq!(version, Version(0));
	assert_eq!(columns, vec![name_column(), age_column()]);
	assert_eq!(f.schema.bound_columns(TABLE), Some(vec![NAME, AGE]));

	let change = f.service.get_schema_change(TABLE, version).unwrap();
	assert_eq!(change.columns, vec![NAME, AGE]);
	assert_eq!(f.service.get_change_for_version(TABLE, version).unwrap().row_count, 0);

	wait_available(&f, TABLE);
	assert_eq!(f.index.schema(TABLE), Some(vec![name_column(), age_column()]));
}

#[test]
fn test_mixed_transaction_returns_one_result_per_change() {
	let f = fixture();

	let results = f
		.service
		.update_table_with_transaction(
			USER,
			TABLE,
			vec![
				TableChange::SchemaChange(SchemaChangeRequest {
					changes: vec![ColumnChange::add(AGE)],
					ordered_columns: None,
				}),
				TableChange::AppendPartialRows(SparseChangeSet::new(None, vec![SparseRow::new().set(NAME, "a").set(AGE, "30")])),
			],
		)
		.unwrap();

	assert_eq!(results.len(), 2);
	assert!(matches!(results[0], TableChangeResult::Schema { version: Version(0), .. }));
	assert_eq!(results[1].version(), Some(Version(1)));
}

#[test]
fn test_delete_all_rows_resets_history() {
	let f = fixture();
	f.service.append_rows(USER, TABLE, rows(&["a"])).unwrap();
	f.service.append_rows(USER, TABLE, rows(&["b"])).unwrap();
	wait_available(&f, TABLE);

	assert_eq!(f.service.delete_all_rows(USER, TABLE).unwrap(), 2);
	assert!(f.service.list_changes(TABLE, None).unwrap().is_empty());
	assert!(f.service.last_change(TABLE).unwrap().is_none());
	wait_available(&f, TABLE);
	assert_eq!(f.index.row_count(TABLE), Some(0));
	assert_eq!(f.service.index_status(TABLE).unwrap().unwrap().applied_version, Version::NONE);

	let refs = f.service.append_rows(USER, TABLE, rows(&["c"])).unwrap();
	assert_eq!(
		refs,
		vec![RowReference {
			row_id: RowId(0),
			version: Version(0),
		}]
	);
	wait_available(&f, TABLE);
	assert_eq!(state(&f, TABLE), Some(IndexState::Available));
	assert_eq!(f.index.row_count(TABLE), Some(1));
}

#[test]
fn test_denied_user_cannot_write() {
	let f = fixture_with(config(), |builder| builder.with_access_control(Arc::new(DenyAll)));

	let err = f.service.append_rows(USER, TABLE, rows(&["a"])).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Unauthorized);
	assert_eq!(f.service.delete_all_rows(USER, TABLE).unwrap_err().kind(), ErrorKind::Unauthorized);
	assert!(f.service.list_changes(TABLE, None).unwrap().is_empty());
}

#[test]
fn test_unknown_table_is_not_found() {
	let f = fixture();
	let err = f.service.append_rows(USER, tablelog::TableId(999), rows(&["a"])).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::NotFound);
}
