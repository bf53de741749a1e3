// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tablelog_type::{
	ColumnId, Etag, Result, RowId, Version, diagnostic::validation::row_width_mismatch, return_error,
};

/// A partial row: only the columns present in `values` are touched.
///
/// A row with an id and no values deletes that row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SparseRow {
	pub row_id: Option<RowId>,
	pub version: Option<Version>,
	pub values: BTreeMap<ColumnId, Option<String>>,
}

impl SparseRow {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_id(row_id: RowId, version: Option<Version>) -> Self {
		Self {
			row_id: Some(row_id),
			version,
			values: BTreeMap::new(),
		}
	}

	pub fn set(mut self, column: ColumnId, value: impl Into<String>) -> Self {
		self.values.insert(column, Some(value.into()));
		self
	}

	pub fn set_null(mut self, column: ColumnId) -> Self {
		self.values.insert(column, None);
		self
	}

	pub fn is_delete(&self) -> bool {
		self.row_id.is_some() && self.values.is_empty()
	}
}

/// Payload of a row change: an ordered list of partial rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SparseChangeSet {
	/// On input, the etag of the state the caller read. Once appended, the
	/// etag of the change itself.
	pub etag: Option<Etag>,
	pub rows: Vec<SparseRow>,
}

impl SparseChangeSet {
	pub fn new(etag: Option<Etag>, rows: Vec<SparseRow>) -> Self {
		Self {
			etag,
			rows,
		}
	}

	pub fn row_count(&self) -> usize {
		self.rows.len()
	}

	/// Rows without an id; each needs a freshly issued one.
	pub fn new_row_count(&self) -> usize {
		self.rows.iter().filter(|row| row.row_id.is_none()).count()
	}

	pub fn row_ids(&self) -> impl Iterator<Item = RowId> + '_ {
		self.rows.iter().filter_map(|row| row.row_id)
	}
}

/// A full row: one value per header column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
	pub row_id: Option<RowId>,
	pub version: Option<Version>,
	pub values: Vec<Option<String>>,
}

/// Rows in full form, sharing one header.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RowSet {
	pub etag: Option<Etag>,
	pub headers: Vec<ColumnId>,
	pub rows: Vec<Row>,
}

impl RowSet {
	pub fn to_sparse(&self) -> Result<SparseChangeSet> {
		let mut rows = Vec::with_capacity(self.rows.len());
		for row in &self.rows {
			if row.values.len() != self.headers.len() {
				return_error!(row_width_mismatch(self.headers.len(), row.values.len()));
			}
			let values = self.headers.iter().copied().zip(row.values.iter().cloned()).collect();
			rows.push(SparseRow {
				row_id: row.row_id,
				version: row.version,
				values,
			});
		}
		Ok(SparseChangeSet {
			etag: self.etag.clone(),
			rows,
		})
	}
}
