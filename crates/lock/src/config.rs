// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::time::Duration;

use serde::Deserialize;
use tablelog_type::duration_ms;

/// Lock wait bounds, in milliseconds when deserialized.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LockConfig {
	/// Wait for the table-exclusive transaction lock.
	#[serde(with = "duration_ms")]
	pub table_timeout: Duration,
	/// Wait for index locks taken by builders.
	#[serde(with = "duration_ms")]
	pub index_timeout: Duration,
	/// Wait for metadata row locks, e.g. the sequence record.
	#[serde(with = "duration_ms")]
	pub row_timeout: Duration,
}

impl Default for LockConfig {
	fn default() -> Self {
		Self {
			table_timeout: Duration::from_secs(10),
			index_timeout: Duration::from_secs(5),
			row_timeout: Duration::from_secs(10),
		}
	}
}

impl LockConfig {
	pub fn table_timeout(mut self, timeout: Duration) -> Self {
		self.table_timeout = timeout;
		self
	}

	pub fn index_timeout(mut self, timeout: Duration) -> Self {
		self.index_timeout = timeout;
		self
	}

	pub fn row_timeout(mut self, timeout: Duration) -> Self {
		self.row_timeout = timeout;
		self
	}
}
