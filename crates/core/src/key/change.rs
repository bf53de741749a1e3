// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use tablelog_type::{TableId, Version};

use super::{EncodableKey, KeyKind, header, keycode::KeyDeserializer, read_header};
use crate::{EncodedKey, EncodedKeyRange};

/// Key of one change record; keys of a table sort by version.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeKey {
	pub table: TableId,
	pub version: Version,
}

impl EncodableKey for ChangeKey {
	const KIND: KeyKind = KeyKind::Change;

	fn encode(&self) -> EncodedKey {
		let mut serializer = header(Self::KIND, 18);
		serializer.extend_u64(self.table).extend_i64(self.version);
		serializer.to_encoded_key()
	}

	fn decode(key: &EncodedKey) -> Option<Self> {
		let mut de = KeyDeserializer::from_bytes(key.as_slice());
		read_header(&mut de, Self::KIND)?;
		let table = de.read_u64()?;
		let version = de.read_i64()?;
		Some(Self {
			table: TableId(table),
			version: Version(version),
		})
	}
}

impl ChangeKey {
	pub fn encoded(table: impl Into<TableId>, version: impl Into<Version>) -> EncodedKey {
		Self {
			table: table.into(),
			version: version.into(),
		}
		.encode()
	}

	/// Every change of the table.
	pub fn full_scan(table: TableId) -> EncodedKeyRange {
		EncodedKeyRange::prefix(&Self::table_prefix(table))
	}

	/// Changes of the table with a version strictly greater than `version`.
	pub fn after(table: TableId, version: Version) -> EncodedKeyRange {
		let start = Self::encoded(table, version.next());
		EncodedKeyRange::from_within_prefix(start, &Self::table_prefix(table))
	}

	fn table_prefix(table: TableId) -> Vec<u8> {
		let mut serializer = header(Self::KIND, 10);
		serializer.extend_u64(table);
		serializer.finish()
	}
}
