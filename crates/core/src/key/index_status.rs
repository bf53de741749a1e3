// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use tablelog_type::TableId;

use super::{EncodableKey, KeyKind, header, keycode::KeyDeserializer, read_header};
use crate::EncodedKey;

/// Key of the build status of a table's or view's physical index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexStatusKey {
	pub target: TableId,
}

impl EncodableKey for IndexStatusKey {
	const KIND: KeyKind = KeyKind::IndexStatus;

	fn encode(&self) -> EncodedKey {
		let mut serializer = header(Self::KIND, 10);
		serializer.extend_u64(self.target);
		serializer.to_encoded_key()
	}

	fn decode(key: &EncodedKey) -> Option<Self> {
		let mut de = KeyDeserializer::from_bytes(key.as_slice());
		read_header(&mut de, Self::KIND)?;
		let target = de.read_u64()?;
		Some(Self {
			target: TableId(target),
		})
	}
}

impl IndexStatusKey {
	pub fn encoded(target: impl Into<TableId>) -> EncodedKey {
		Self {
			target: target.into(),
		}
		.encode()
	}
}
