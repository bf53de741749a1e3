// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use serde::{Deserialize, Serialize};
use tablelog_type::{ColumnId, Etag, RowId, Version};

use super::{ColumnChange, ColumnModel, RowReference, RowSet, SparseChangeSet};

/// Rows named for deletion, read at `etag`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSelection {
	pub etag: Option<Etag>,
	pub row_ids: Vec<RowId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaChangeRequest {
	pub changes: Vec<ColumnChange>,
	/// Explicit column order after the change; derived from `changes` when unset.
	pub ordered_columns: Option<Vec<ColumnId>>,
}

/// One change submitted as part of a table transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableChange {
	AppendRows(RowSet),
	AppendPartialRows(SparseChangeSet),
	DeleteRows(RowSelection),
	SchemaChange(SchemaChangeRequest),
}

impl TableChange {
	pub fn name(&self) -> &'static str {
		match self {
			TableChange::AppendRows(_) => "append rows",
			TableChange::AppendPartialRows(_) => "append partial rows",
			TableChange::DeleteRows(_) => "delete rows",
			TableChange::SchemaChange(_) => "schema",
		}
	}

	/// Schema changes must be checked against the table's existing data.
	pub fn requires_full_validation(&self) -> bool {
		matches!(self, TableChange::SchemaChange(_))
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableChangeResult {
	Rows(Vec<RowReference>),
	Schema {
		version: Version,
		columns: Vec<ColumnModel>,
	},
}

impl TableChangeResult {
	pub fn version(&self) -> Option<Version> {
		match self {
			TableChangeResult::Rows(rows) => rows.first().map(|r| r.version),
			TableChangeResult::Schema {
				version,
				..
			} => Some(*version),
		}
	}
}
