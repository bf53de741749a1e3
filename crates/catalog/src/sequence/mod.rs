// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use tablelog_core::{
	encoded::{decode_value, encode_value},
	key::SequenceKey,
	model::{RowIdRange, SequenceRecord},
};
use tablelog_store::{CommandTransaction, MetadataRead};
use tablelog_type::{
	Error, Etag, Result, RowId, TableId, Version,
	diagnostic::sequence::{allocation_failed, sequence_exhausted},
	return_error,
};
use tracing::{debug, instrument};
use uuid::Uuid;

/// Issues row ids and versions from the table's sequence record, which is
/// read under a row lock and rewritten in the caller's transaction. Other
/// reservers of the same table wait until that transaction finishes.
pub struct SequenceAllocator;

impl SequenceAllocator {
	#[instrument(name = "catalog::sequence::reserve", level = "debug", skip(txn), fields(table = %table))]
	pub fn reserve(txn: &mut CommandTransaction, table: TableId, count: u64) -> Result<RowIdRange> {
		let key = SequenceKey::encoded(table);
		let current = match txn.get_for_update(&key).map_err(|e| allocation_error(table, e))? {
			Some(bytes) => decode_value::<SequenceRecord>(&bytes)?,
			None => SequenceRecord {
				table,
				max_row_id: RowId::NONE,
				version: Version::NONE,
				etag: Etag::new(""),
			},
		};

		let Some(min_id) = current.max_row_id.0.checked_add(1) else {
			return_error!(sequence_exhausted(table, count));
		};
		let Some(max_id) = i64::try_from(count).ok().and_then(|count| current.max_row_id.0.checked_add(count)) else {
			return_error!(sequence_exhausted(table, count));
		};

		let next = SequenceRecord {
			table,
			max_row_id: RowId(max_id),
			version: current.version.next(),
			etag: Etag::new(Uuid::new_v4().to_string()),
		};
		txn.set(&key, encode_value(&next)?).map_err(|e| allocation_error(table, e))?;

		debug!(version = %next.version, min_id, max_id, "reserved");
		Ok(RowIdRange {
			min_id: RowId(min_id),
			max_id: next.max_row_id,
			max_update_id: current.max_row_id,
			version: next.version,
			etag: next.etag,
		})
	}

	/// The table's sequence record, if anything was ever reserved.
	pub fn current(rx: &impl MetadataRead, table: TableId) -> Result<Option<SequenceRecord>> {
		match rx.get(&SequenceKey::encoded(table))? {
			Some(bytes) => Ok(Some(decode_value(&bytes)?)),
			None => Ok(None),
		}
	}

	pub fn delete(txn: &mut CommandTransaction, table: TableId) -> Result<()> {
		txn.remove(&SequenceKey::encoded(table))
	}
}

/// Lock timeouts stay retryable; every other store failure is an allocation
/// failure.
fn allocation_error(table: TableId, err: Error) -> Error {
	if err.is_retryable() {
		return err;
	}
	let reason = err.diagnostic().message.clone();
	err.with_context(allocation_failed(table, reason))
}
