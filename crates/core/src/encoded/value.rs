// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use serde::{Serialize, de::DeserializeOwned};
use tablelog_type::{
	Result,
	diagnostic::serde::{serde_deserialize_error, serde_serialize_error},
	error,
};

/// Encodes a metadata record for storage.
pub fn encode_value<T: Serialize>(value: &T) -> Result<Vec<u8>> {
	postcard::to_stdvec(value).map_err(|e| error!(serde_serialize_error(e.to_string())))
}

/// Decodes a metadata record read from storage.
pub fn decode_value<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
	postcard::from_bytes(bytes).map_err(|e| error!(serde_deserialize_error(e.to_string())))
}
