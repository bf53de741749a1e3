// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use tablelog_type::{TableId, Version};

/// Lifecycle of a physical index build.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexState {
	Pending,
	Processing,
	Available,
	Failed,
}

impl Display for IndexState {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			IndexState::Pending => "PENDING",
			IndexState::Processing => "PROCESSING",
			IndexState::Available => "AVAILABLE",
			IndexState::Failed => "FAILED",
		};
		f.write_str(name)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStatus {
	pub target: TableId,
	pub state: IndexState,
	pub schema_checksum: Option<u64>,
	pub source_checksum: Option<u64>,
	/// Last change version applied to a table index; unused for views.
	pub applied_version: Version,
	pub diagnostic: Option<String>,
	/// Milliseconds since the unix epoch.
	pub changed_on: u64,
}

impl IndexStatus {
	pub fn pending(target: TableId, now: u64) -> Self {
		Self {
			target,
			state: IndexState::Pending,
			schema_checksum: None,
			source_checksum: None,
			applied_version: Version::NONE,
			diagnostic: None,
			changed_on: now,
		}
	}

	pub fn is_available(&self) -> bool {
		self.state == IndexState::Available
	}
}
