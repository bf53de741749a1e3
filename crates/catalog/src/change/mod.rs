// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

mod append;
mod codec;
mod delete;
pub(crate) mod read;

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use tablelog_core::{
	interface::BlobStore,
	model::{ChangeRecord, ChangeType, SchemaChangeSet, SparseChangeSet},
};
use tablelog_store::{CommandTransaction, MetadataRead};
use tablelog_type::{
	Etag, Result, TableId, Version,
	diagnostic::change::{change_blob_missing, change_not_found, change_type_mismatch, etag_not_found},
	error, return_error,
};
use uuid::Uuid;

use crate::{ConflictDetector, SequenceAllocator};

/// Where change payloads live in the blob store.
#[derive(Clone)]
pub(crate) struct ChangeBlobs {
	blobs: Arc<dyn BlobStore>,
	bucket: String,
}

impl ChangeBlobs {
	pub(crate) fn new(blobs: Arc<dyn BlobStore>, bucket: String) -> Self {
		Self {
			blobs,
			bucket,
		}
	}

	/// Writes a payload under a fresh key that the transaction deletes again
	/// if it rolls back.
	fn put<T: Serialize>(&self, txn: &mut CommandTransaction, table: TableId, value: &T) -> Result<String> {
		let bytes = codec::encode_blob(value)?;
		let key = format!("{}/{}", table, Uuid::new_v4());
		self.blobs.put(&self.bucket, &key, &bytes)?;
		txn.track_blob(self.blobs.clone(), &self.bucket, &key);
		Ok(key)
	}

	pub(crate) fn load<T: DeserializeOwned>(&self, record: &ChangeRecord) -> Result<T> {
		match self.blobs.get(&self.bucket, &record.blob_key)? {
			Some(bytes) => codec::decode_blob(&bytes),
			None => return_error!(change_blob_missing(record.table, record.version, &record.blob_key)),
		}
	}

	fn delete_on_commit(&self, txn: &mut CommandTransaction, key: &str) {
		txn.delete_blob_on_commit(self.blobs.clone(), &self.bucket, key);
	}
}

/// The append-only history of every table. Each change is an immutable
/// metadata record plus a compressed payload in the blob store.
#[derive(Clone)]
pub struct ChangeLogStore {
	blobs: ChangeBlobs,
	detector: ConflictDetector,
}

impl ChangeLogStore {
	pub fn new(blobs: Arc<dyn BlobStore>, bucket: impl Into<String>) -> Self {
		let blobs = ChangeBlobs::new(blobs, bucket.into());
		Self {
			detector: ConflictDetector::new(blobs.clone()),
			blobs,
		}
	}

	pub fn conflict_detector(&self) -> &ConflictDetector {
		&self.detector
	}

	pub fn get_change(&self, rx: &impl MetadataRead, table: TableId, version: Version) -> Result<ChangeRecord> {
		read::get_record(rx, table, version)?.ok_or_else(|| error!(change_not_found(table, version)))
	}

	/// Every change of the table in version order, or only those after `since`.
	pub fn list_changes(&self, rx: &impl MetadataRead, table: TableId, since: Option<Version>) -> Result<Vec<ChangeRecord>> {
		read::records_after(rx, table, since.unwrap_or(Version::NONE))
	}

	/// Every committed reservation of the sequence belongs to exactly one
	/// change, so the sequence version names the latest change.
	pub fn last_change(&self, rx: &impl MetadataRead, table: TableId) -> Result<Option<ChangeRecord>> {
		match SequenceAllocator::current(rx, table)? {
			Some(sequence) => read::get_record(rx, table, sequence.version),
			None => Ok(None),
		}
	}

	pub fn version_for_etag(&self, rx: &impl MetadataRead, table: TableId, etag: &Etag) -> Result<Version> {
		read::version_for_etag(rx, table, etag)?.ok_or_else(|| error!(etag_not_found(table, etag)))
	}

	/// The rows written by a row change, with their ids and versions.
	pub fn get_row_set(&self, rx: &impl MetadataRead, table: TableId, version: Version) -> Result<SparseChangeSet> {
		let record = self.get_change(rx, table, version)?;
		if record.change_type != ChangeType::Row {
			return_error!(change_type_mismatch(table, version, "row"));
		}
		self.blobs.load(&record)
	}

	pub fn get_schema_change(&self, rx: &impl MetadataRead, table: TableId, version: Version) -> Result<SchemaChangeSet> {
		let record = self.get_change(rx, table, version)?;
		if record.change_type != ChangeType::Column {
			return_error!(change_type_mismatch(table, version, "column"));
		}
		self.blobs.load(&record)
	}
}
