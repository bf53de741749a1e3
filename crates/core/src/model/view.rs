// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tablelog_type::{ColumnId, TableId, Version};

/// A materialized view: a derived table computed from a read-only query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewDefinition {
	pub view: TableId,
	pub defining_query: String,
	pub sources: BTreeSet<TableId>,
	pub schema: Vec<ColumnId>,
	/// Set when the view is a snapshot pinned at a version; live views rebind
	/// their schema on every rebuild.
	pub pinned: Option<Version>,
}

impl ViewDefinition {
	pub fn is_live(&self) -> bool {
		self.pinned.is_none()
	}
}
