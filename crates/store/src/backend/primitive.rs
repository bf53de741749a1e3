// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

//! The minimal key-value interface storage backends implement. Transactions,
//! row locks and key layout belong to the layers above.

use std::ops::Bound;

use tablelog_type::Result;

/// A raw storage entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
	pub key: Vec<u8>,
	pub value: Vec<u8>,
}

pub trait PrimitiveStorage: Send + Sync + Clone + 'static {
	fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

	fn contains(&self, key: &[u8]) -> Result<bool> {
		Ok(self.get(key)?.is_some())
	}

	/// Applies a batch atomically. A `None` value removes the key.
	fn apply(&self, batch: &[(Vec<u8>, Option<Vec<u8>>)]) -> Result<()>;

	/// Entries within the bounds, in ascending key order.
	fn range(&self, start: Bound<&[u8]>, end: Bound<&[u8]>) -> Result<Vec<RawEntry>>;

	fn clear(&self) -> Result<()>;
}
