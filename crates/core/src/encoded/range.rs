// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::ops::Bound;

use super::EncodedKey;

#[derive(Debug, Clone, PartialEq)]
pub struct EncodedKeyRange {
	pub start: Bound<EncodedKey>,
	pub end: Bound<EncodedKey>,
}

impl EncodedKeyRange {
	pub fn new(start: Bound<EncodedKey>, end: Bound<EncodedKey>) -> Self {
		Self {
			start,
			end,
		}
	}

	/// All keys starting with `prefix`.
	pub fn prefix(prefix: &[u8]) -> Self {
		let start = Bound::Included(EncodedKey::new(prefix));
		let end = match prefix.iter().rposition(|&b| b != 0xff) {
			Some(i) => {
				let mut end = prefix[..=i].to_vec();
				end[i] += 1;
				Bound::Excluded(EncodedKey::new(end))
			}
			None => Bound::Unbounded,
		};
		Self {
			start,
			end,
		}
	}

	/// Keys from `start` (inclusive) up to the end of `prefix`.
	pub fn from_within_prefix(start: EncodedKey, prefix: &[u8]) -> Self {
		let mut range = Self::prefix(prefix);
		range.start = Bound::Included(start);
		range
	}

	pub fn contains(&self, key: &EncodedKey) -> bool {
		let after_start = match &self.start {
			Bound::Included(start) => key >= start,
			Bound::Excluded(start) => key > start,
			Bound::Unbounded => true,
		};
		let before_end = match &self.end {
			Bound::Included(end) => key <= end,
			Bound::Excluded(end) => key < end,
			Bound::Unbounded => true,
		};
		after_start && before_end
	}

	pub fn start_bound(&self) -> Bound<&[u8]> {
		as_slice_bound(&self.start)
	}

	pub fn end_bound(&self) -> Bound<&[u8]> {
		as_slice_bound(&self.end)
	}
}

fn as_slice_bound(bound: &Bound<EncodedKey>) -> Bound<&[u8]> {
	match bound {
		Bound::Included(key) => Bound::Included(key.as_slice()),
		Bound::Excluded(key) => Bound::Excluded(key.as_slice()),
		Bound::Unbounded => Bound::Unbounded,
	}
}

#[cfg(test)]
mod tests {
	use std::ops::Bound;

	use super::EncodedKeyRange;
	use crate::EncodedKey;

	#[test]
	fn test_prefix_increments_last_byte() {
		let range = EncodedKeyRange::prefix(&[1, 2, 3]);
		assert_eq!(range.start, Bound::Included(EncodedKey::new(vec![1, 2, 3])));
		assert_eq!(range.end, Bound::Excluded(EncodedKey::new(vec![1, 2, 4])));
	}

	#[test]
	fn test_prefix_carries_over_ff() {
		let range = EncodedKeyRange::prefix(&[1, 0xff, 0xff]);
		assert_eq!(range.end, Bound::Excluded(EncodedKey::new(vec![2])));

		let range = EncodedKeyRange::prefix(&[0xff]);
		assert_eq!(range.end, Bound::Unbounded);
	}

	#[test]
	fn test_contains() {
		let range = EncodedKeyRange::prefix(&[1, 2]);
		assert!(range.contains(&EncodedKey::new(vec![1, 2])));
		assert!(range.contains(&EncodedKey::new(vec![1, 2, 0xff, 0xff])));
		assert!(!range.contains(&EncodedKey::new(vec![1, 3])));
		assert!(!range.contains(&EncodedKey::new(vec![1])));
	}
}
