// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use tablelog_type::TableId;

use super::{EncodableKey, KeyKind, header, keycode::KeyDeserializer, read_header};
use crate::{EncodedKey, EncodedKeyRange};

/// Edge from a view to one of its source tables.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSourceKey {
	pub view: TableId,
	pub source: TableId,
}

impl EncodableKey for ViewSourceKey {
	const KIND: KeyKind = KeyKind::ViewSource;

	fn encode(&self) -> EncodedKey {
		let mut serializer = header(Self::KIND, 18);
		serializer.extend_u64(self.view).extend_u64(self.source);
		serializer.to_encoded_key()
	}

	fn decode(key: &EncodedKey) -> Option<Self> {
		let mut de = KeyDeserializer::from_bytes(key.as_slice());
		read_header(&mut de, Self::KIND)?;
		let view = de.read_u64()?;
		let source = de.read_u64()?;
		Some(Self {
			view: TableId(view),
			source: TableId(source),
		})
	}
}

impl ViewSourceKey {
	pub fn encoded(view: TableId, source: TableId) -> EncodedKey {
		Self {
			view,
			source,
		}
		.encode()
	}

	pub fn full_scan(view: TableId) -> EncodedKeyRange {
		let mut serializer = header(Self::KIND, 10);
		serializer.extend_u64(view);
		EncodedKeyRange::prefix(&serializer.finish())
	}
}
