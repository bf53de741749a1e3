// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use serde::{Deserialize, Serialize};
use tablelog_type::{Etag, RowId, TableId, UserId, Version};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeType {
	Row,
	Column,
}

/// One immutable entry in a table's history. The payload lives in the blob
/// named by `blob_key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
	pub table: TableId,
	pub version: Version,
	pub etag: Etag,
	pub change_type: ChangeType,
	pub created_by: UserId,
	/// Milliseconds since the unix epoch.
	pub created_on: u64,
	pub blob_key: String,
	pub row_count: u64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowReference {
	pub row_id: RowId,
	pub version: Version,
}
