// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use tablelog_type::{Etag, TableId};

use super::{EncodableKey, KeyKind, header, keycode::KeyDeserializer, read_header};
use crate::{EncodedKey, EncodedKeyRange};

/// Maps a change etag back to its version.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEtagKey {
	pub table: TableId,
	pub etag: Etag,
}

impl EncodableKey for ChangeEtagKey {
	const KIND: KeyKind = KeyKind::ChangeEtag;

	fn encode(&self) -> EncodedKey {
		let mut serializer = header(Self::KIND, 12 + self.etag.as_str().len());
		serializer.extend_u64(self.table).extend_str(self.etag.as_str());
		serializer.to_encoded_key()
	}

	fn decode(key: &EncodedKey) -> Option<Self> {
		let mut de = KeyDeserializer::from_bytes(key.as_slice());
		read_header(&mut de, Self::KIND)?;
		let table = de.read_u64()?;
		let etag = de.read_str()?;
		Some(Self {
			table: TableId(table),
			etag: Etag(etag),
		})
	}
}

impl ChangeEtagKey {
	pub fn encoded(table: TableId, etag: &Etag) -> EncodedKey {
		Self {
			table,
			etag: etag.clone(),
		}
		.encode()
	}

	pub fn full_scan(table: TableId) -> EncodedKeyRange {
		let mut serializer = header(Self::KIND, 10);
		serializer.extend_u64(table);
		EncodedKeyRange::prefix(&serializer.finish())
	}
}
