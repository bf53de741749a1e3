// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use tablelog_type::TableId;

use super::{EncodableKey, KeyKind, header, keycode::KeyDeserializer, read_header};
use crate::EncodedKey;

/// Key of the per-table row id / version counter.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceKey {
	pub table: TableId,
}

impl EncodableKey for SequenceKey {
	const KIND: KeyKind = KeyKind::Sequence;

	fn encode(&self) -> EncodedKey {
		let mut serializer = header(Self::KIND, 10);
		serializer.extend_u64(self.table);
		serializer.to_encoded_key()
	}

	fn decode(key: &EncodedKey) -> Option<Self> {
		let mut de = KeyDeserializer::from_bytes(key.as_slice());
		read_header(&mut de, Self::KIND)?;
		let table = de.read_u64()?;
		Some(Self {
			table: TableId(table),
		})
	}
}

impl SequenceKey {
	pub fn encoded(table: impl Into<TableId>) -> EncodedKey {
		Self {
			table: table.into(),
		}
		.encode()
	}
}
