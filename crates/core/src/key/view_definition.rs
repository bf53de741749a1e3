// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use tablelog_type::TableId;

use super::{EncodableKey, KeyKind, header, keycode::KeyDeserializer, read_header};
use crate::EncodedKey;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewDefinitionKey {
	pub view: TableId,
}

impl EncodableKey for ViewDefinitionKey {
	const KIND: KeyKind = KeyKind::ViewDefinition;

	fn encode(&self) -> EncodedKey {
		let mut serializer = header(Self::KIND, 10);
		serializer.extend_u64(self.view);
		serializer.to_encoded_key()
	}

	fn decode(key: &EncodedKey) -> Option<Self> {
		let mut de = KeyDeserializer::from_bytes(key.as_slice());
		read_header(&mut de, Self::KIND)?;
		let view = de.read_u64()?;
		Some(Self {
			view: TableId(view),
		})
	}
}

impl ViewDefinitionKey {
	pub fn encoded(view: impl Into<TableId>) -> EncodedKey {
		Self {
			view: view.into(),
		}
		.encode()
	}
}
