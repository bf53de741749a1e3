// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use crate::{ColumnId, ColumnType, ErrorKind, RowId, TableId, error::diagnostic::Diagnostic};

/// A row references a column that is not part of the table's schema
pub fn unknown_column(table: TableId, column: ColumnId) -> Diagnostic {
	Diagnostic::new(
		ErrorKind::Validation,
		"VAL_001",
		format!("column {} is not part of the schema of table {}", column, table),
	)
}

/// A cell value does not match its column type
pub fn invalid_value(column: ColumnId, column_type: ColumnType, value: &str) -> Diagnostic {
	Diagnostic::new(
		ErrorKind::Validation,
		"VAL_002",
		format!("value '{}' is not a valid {} for column {}", value, column_type, column),
	)
}

/// An explicit row id exceeds the highest id ever issued for the table
pub fn row_id_not_issued(table: TableId, row: RowId, max_issued: RowId) -> Diagnostic {
	Diagnostic::new(
		ErrorKind::Validation,
		"VAL_003",
		format!("row id {} of table {} was never issued (highest issued is {})", row, table, max_issued),
	)
	.with_help("Omit the row id to append a new row")
}

/// An update neither names the row version nor carries an etag
pub fn missing_row_version(row: RowId) -> Diagnostic {
	Diagnostic::new(
		ErrorKind::Validation,
		"VAL_004",
		format!("update of row {} carries neither a row version nor an etag", row),
	)
	.with_help("Supply the version the row was read at, or the etag of that read")
}

/// The target kind does not accept the requested change
pub fn change_not_supported(table: TableId, target: &str, change: &str) -> Diagnostic {
	Diagnostic::new(
		ErrorKind::Validation,
		"VAL_005",
		format!("{} {} does not accept {} changes", target, table, change),
	)
}

/// The table kind is unknown to the schema provider
pub fn table_not_found(table: TableId) -> Diagnostic {
	Diagnostic::new(ErrorKind::NotFound, "VAL_006", format!("table {} does not exist", table))
}

/// A transaction was submitted without any change
pub fn empty_transaction(table: TableId) -> Diagnostic {
	Diagnostic::new(
		ErrorKind::Validation,
		"VAL_007",
		format!("transaction on table {} contains no changes", table),
	)
}

/// A row set header and a row disagree on the number of cells
pub fn row_width_mismatch(expected: usize, actual: usize) -> Diagnostic {
	Diagnostic::new(
		ErrorKind::Validation,
		"VAL_008",
		format!("row has {} values but the header names {} columns", actual, expected),
	)
}

/// A column cannot be converted to its new type
pub fn incompatible_column_change(column: ColumnId, to: ColumnType, value: &str) -> Diagnostic {
	Diagnostic::new(
		ErrorKind::Validation,
		"VAL_009",
		format!("existing value '{}' of column {} cannot be converted to {}", value, column, to),
	)
}

/// The same row appears more than once in a change set
pub fn duplicate_row(row: RowId) -> Diagnostic {
	Diagnostic::new(ErrorKind::Validation, "VAL_010", format!("row {} appears more than once in the change", row))
}

/// A defining query could not be parsed
pub fn invalid_query(query: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic::new(ErrorKind::Validation, "VAL_011", format!("invalid defining query '{}': {}", query, reason.into()))
}

/// A column id does not resolve to a column model
pub fn column_not_found(column: ColumnId) -> Diagnostic {
	Diagnostic::new(ErrorKind::NotFound, "VAL_012", format!("column {} does not exist", column))
}
