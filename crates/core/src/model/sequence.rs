// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use serde::{Deserialize, Serialize};
use tablelog_type::{Etag, RowId, TableId, Version};

/// Per-table row id / version counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceRecord {
	pub table: TableId,
	pub max_row_id: RowId,
	pub version: Version,
	pub etag: Etag,
}

/// Result of one reservation against a [`SequenceRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct RowIdRange {
	pub min_id: RowId,
	pub max_id: RowId,
	/// Highest row id issued before this reservation. Rows at or below it
	/// already exist, rows above it are new.
	pub max_update_id: RowId,
	pub version: Version,
	pub etag: Etag,
}

impl RowIdRange {
	/// Number of fresh row ids in the range.
	pub fn len(&self) -> u64 {
		(self.max_id.0 - self.min_id.0 + 1).max(0) as u64
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn ids(&self) -> impl Iterator<Item = RowId> {
		(self.min_id.0..=self.max_id.0).map(RowId)
	}
}

#[cfg(test)]
mod tests {
	use tablelog_type::{Etag, RowId, Version};

	use super::RowIdRange;

	#[test]
	fn test_empty_range() {
		let range = RowIdRange {
			min_id: RowId(5),
			max_id: RowId(4),
			max_update_id: RowId(4),
			version: Version(2),
			etag: Etag::from("e"),
		};
		assert!(range.is_empty());
		assert_eq!(range.ids().count(), 0);
	}

	#[test]
	fn test_ids() {
		let range = RowIdRange {
			min_id: RowId(0),
			max_id: RowId(4),
			max_update_id: RowId(-1),
			version: Version(0),
			etag: Etag::from("e"),
		};
		assert_eq!(range.len(), 5);
		assert_eq!(range.ids().collect::<Vec<_>>(), (0..5).map(RowId).collect::<Vec<_>>());
	}
}
