// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use tablelog_core::{
	encoded::decode_value,
	key::{ChangeEtagKey, ChangeKey},
	model::ChangeRecord,
};
use tablelog_store::MetadataRead;
use tablelog_type::{Etag, Result, TableId, Version};

pub(crate) fn get_record(rx: &impl MetadataRead, table: TableId, version: Version) -> Result<Option<ChangeRecord>> {
	match rx.get(&ChangeKey::encoded(table, version))? {
		Some(bytes) => Ok(Some(decode_value(&bytes)?)),
		None => Ok(None),
	}
}

pub(crate) fn version_for_etag(rx: &impl MetadataRead, table: TableId, etag: &Etag) -> Result<Option<Version>> {
	match rx.get(&ChangeEtagKey::encoded(table, etag))? {
		Some(bytes) => Ok(Some(decode_value(&bytes)?)),
		None => Ok(None),
	}
}

/// Change records with a version strictly greater than `version`, ascending.
pub(crate) fn records_after(rx: &impl MetadataRead, table: TableId, version: Version) -> Result<Vec<ChangeRecord>> {
	rx.range(&ChangeKey::after(table, version))?.into_iter().map(|(_, bytes)| decode_value(&bytes)).collect()
}
