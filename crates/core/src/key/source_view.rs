// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::ops::Bound;

use tablelog_type::TableId;

use super::{EncodableKey, KeyKind, header, keycode::KeyDeserializer, read_header};
use crate::{EncodedKey, EncodedKeyRange};

/// Reverse edge from a source table to a view depending on it.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceViewKey {
	pub source: TableId,
	pub view: TableId,
}

impl EncodableKey for SourceViewKey {
	const KIND: KeyKind = KeyKind::SourceView;

	fn encode(&self) -> EncodedKey {
		let mut serializer = header(Self::KIND, 18);
		serializer.extend_u64(self.source).extend_u64(self.view);
		serializer.to_encoded_key()
	}

	fn decode(key: &EncodedKey) -> Option<Self> {
		let mut de = KeyDeserializer::from_bytes(key.as_slice());
		read_header(&mut de, Self::KIND)?;
		let source = de.read_u64()?;
		let view = de.read_u64()?;
		Some(Self {
			source: TableId(source),
			view: TableId(view),
		})
	}
}

impl SourceViewKey {
	pub fn encoded(source: TableId, view: TableId) -> EncodedKey {
		Self {
			source,
			view,
		}
		.encode()
	}

	pub fn full_scan(source: TableId) -> EncodedKeyRange {
		EncodedKeyRange::prefix(&Self::source_prefix(source))
	}

	/// Dependents of `source` ordered after `view`, for paginated scans.
	pub fn after(source: TableId, view: TableId) -> EncodedKeyRange {
		let mut range = EncodedKeyRange::prefix(&Self::source_prefix(source));
		range.start = Bound::Excluded(Self::encoded(source, view));
		range
	}

	fn source_prefix(source: TableId) -> Vec<u8> {
		let mut serializer = header(Self::KIND, 10);
		serializer.extend_u64(source);
		serializer.finish()
	}
}

#[cfg(test)]
mod tests {
	use tablelog_type::TableId;

	use super::{EncodableKey, SourceViewKey};

	#[test]
	fn test_encode_decode() {
		let key = SourceViewKey {
			source: TableId(3),
			view: TableId(77),
		};
		assert_eq!(SourceViewKey::decode(&key.encode()).unwrap(), key);
	}

	#[test]
	fn test_after_pages_forward() {
		let range = SourceViewKey::after(TableId(3), TableId(10));
		assert!(!range.contains(&SourceViewKey::encoded(TableId(3), TableId(10))));
		assert!(range.contains(&SourceViewKey::encoded(TableId(3), TableId(11))));
		assert!(!range.contains(&SourceViewKey::encoded(TableId(4), TableId(11))));
	}
}
