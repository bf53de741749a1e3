// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

//! Shared identifiers, value types and the diagnostic-coded error type used by
//! every tablelog crate.

pub mod error;
mod id;
pub mod value;

pub use error::{Error, ErrorKind, diagnostic};
pub use id::{ColumnId, Etag, RowId, TableId, UserId, Version};
pub use value::ColumnType;

pub type Result<T> = std::result::Result<T, Error>;

/// Serde adapter reading and writing a [`std::time::Duration`] as whole
/// milliseconds.
pub mod duration_ms {
	use std::time::Duration;

	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_u64(duration.as_millis() as u64)
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
		Ok(Duration::from_millis(u64::deserialize(deserializer)?))
	}
}
