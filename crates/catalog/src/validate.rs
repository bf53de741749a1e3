// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::collections::{HashMap, HashSet};

use tablelog_core::model::{ColumnModel, SparseChangeSet};
use tablelog_type::{
	Result, TableId,
	diagnostic::validation::{duplicate_row, invalid_value, unknown_column},
	return_error,
};

/// Checks a delta against the table schema: every column is known, every
/// value parses as its column type, and no row appears twice.
pub fn validate_rows(table: TableId, schema: &[ColumnModel], delta: &SparseChangeSet) -> Result<()> {
	let columns: HashMap<_, _> = schema.iter().map(|c| (c.id, c.column_type)).collect();
	let mut seen = HashSet::new();
	for row in &delta.rows {
		if let Some(row_id) = row.row_id {
			if !seen.insert(row_id) {
				return_error!(duplicate_row(row_id));
			}
		}
		for (column, value) in &row.values {
			let Some(column_type) = columns.get(column) else {
				return_error!(unknown_column(table, *column));
			};
			if let Some(value) = value {
				if !column_type.accepts(value) {
					return_error!(invalid_value(*column, *column_type, value));
				}
			}
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use tablelog_core::model::{ColumnModel, SparseChangeSet, SparseRow};
	use tablelog_type::{ColumnId, ColumnType, RowId, TableId};

	use super::validate_rows;

	fn schema() -> Vec<ColumnModel> {
		vec![ColumnModel::new(1u64, "n", ColumnType::Integer)]
	}

	#[test]
	fn test_accepts_nulls_and_deletes() {
		let delta = SparseChangeSet::new(
			None,
			vec![SparseRow::new().set_null(ColumnId(1)), SparseRow::with_id(RowId(0), None)],
		);
		validate_rows(TableId(1), &schema(), &delta).unwrap();
	}

	#[test]
	fn test_rejects_bad_value() {
		let delta = SparseChangeSet::new(None, vec![SparseRow::new().set(ColumnId(1), "abc")]);
		assert_eq!(validate_rows(TableId(1), &schema(), &delta).unwrap_err().code(), "VAL_002");
	}

	#[test]
	fn test_rejects_duplicate_rows() {
		let delta = SparseChangeSet::new(
			None,
			vec![SparseRow::with_id(RowId(3), None).set(ColumnId(1), "1"), SparseRow::with_id(RowId(3), None)],
		);
		assert_eq!(validate_rows(TableId(1), &schema(), &delta).unwrap_err().code(), "VAL_010");
	}
}
