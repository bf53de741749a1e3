// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

//! Change payloads are postcard-encoded, then zstd-compressed.

use serde::{Serialize, de::DeserializeOwned};
use tablelog_core::encoded::{decode_value, encode_value};
use tablelog_type::{Result, diagnostic::serde::compression_error, error};

const LEVEL: i32 = 3;

pub(crate) fn encode_blob<T: Serialize>(value: &T) -> Result<Vec<u8>> {
	let raw = encode_value(value)?;
	zstd::stream::encode_all(raw.as_slice(), LEVEL).map_err(|e| error!(compression_error(e.to_string())))
}

pub(crate) fn decode_blob<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
	let raw = zstd::stream::decode_all(bytes).map_err(|e| error!(compression_error(e.to_string())))?;
	decode_value(&raw)
}

#[cfg(test)]
mod tests {
	use tablelog_core::model::{SparseChangeSet, SparseRow};
	use tablelog_type::{ColumnId, ErrorKind, RowId, Version};

	use super::{decode_blob, encode_blob};

	#[test]
	fn test_payload_survives_compression() {
		let set = SparseChangeSet::new(
			None,
			(0..100)
				.map(|i| SparseRow::with_id(RowId(i), Some(Version(0))).set(ColumnId(1), "repeated value"))
				.collect(),
		);
		let bytes = encode_blob(&set).unwrap();
		assert!(bytes.len() < 100 * "repeated value".len());
		assert_eq!(decode_blob::<SparseChangeSet>(&bytes).unwrap(), set);
	}

	#[test]
	fn test_garbage_is_rejected() {
		let err = decode_blob::<SparseChangeSet>(b"not zstd").unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Internal);
	}
}
