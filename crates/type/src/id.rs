// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

macro_rules! id_type {
	($(#[$meta:meta])* $name:ident($inner:ty)) => {
		$(#[$meta])*
		#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		pub struct $name(pub $inner);

		impl From<$inner> for $name {
			fn from(value: $inner) -> Self {
				Self(value)
			}
		}

		impl From<$name> for $inner {
			fn from(value: $name) -> Self {
				value.0
			}
		}

		impl Display for $name {
			fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
				Display::fmt(&self.0, f)
			}
		}
	};
}

id_type!(
	/// Identifies a table. Materialized views are derived tables and share this id space.
	TableId(u64)
);
id_type!(ColumnId(u64));
id_type!(UserId(u64));
id_type!(
	/// Row identifier within a single table, issued by the sequence allocator.
	RowId(i64)
);
id_type!(
	/// Position of a change in a table's history. `-1` means "nothing issued yet".
	Version(i64)
);

impl Version {
	pub const NONE: Version = Version(-1);

	pub fn next(self) -> Version {
		Version(self.0 + 1)
	}
}

impl RowId {
	pub const NONE: RowId = RowId(-1);
}

/// Opaque token naming the state a caller believed applied.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Etag(pub String);

impl Etag {
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Display for Etag {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for Etag {
	fn from(value: &str) -> Self {
		Self(value.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_version_next() {
		assert_eq!(Version::NONE.next(), Version(0));
		assert_eq!(Version(41).next(), Version(42));
	}

	#[test]
	fn test_id_serde_is_transparent_tuple() {
		let json = serde_json::to_string(&TableId(7)).unwrap();
		assert_eq!(json, "7");
		let back: TableId = serde_json::from_str(&json).unwrap();
		assert_eq!(back, TableId(7));
	}
}
