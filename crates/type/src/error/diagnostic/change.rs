// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use crate::{ErrorKind, Etag, TableId, Version, error::diagnostic::Diagnostic};

/// No change with this version exists for the table
pub fn change_not_found(table: TableId, version: Version) -> Diagnostic {
	Diagnostic::new(
		ErrorKind::NotFound,
		"CHG_001",
		format!("table {} has no change at version {}", table, version),
	)
}

/// The etag does not name any change of the table
pub fn etag_not_found(table: TableId, etag: &Etag) -> Diagnostic {
	Diagnostic::new(ErrorKind::NotFound, "CHG_002", format!("table {} has no change with etag {}", table, etag))
		.with_help("Re-read the table to obtain a current etag")
}

/// The change exists but carries a different payload type than requested
pub fn change_type_mismatch(table: TableId, version: Version, expected: &str) -> Diagnostic {
	Diagnostic::new(
		ErrorKind::Validation,
		"CHG_003",
		format!("change {} of table {} is not a {} change", version, table, expected),
	)
}

/// The blob referenced by a change record is missing from the blob store
pub fn change_blob_missing(table: TableId, version: Version, key: &str) -> Diagnostic {
	Diagnostic::new(
		ErrorKind::Internal,
		"CHG_004",
		format!("blob '{}' of change {} of table {} is missing", key, version, table),
	)
}
