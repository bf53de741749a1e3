// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use crate::{ErrorKind, RowId, error::diagnostic::Diagnostic};

/// Another change touched the row after the caller's baseline
pub fn row_conflict(row: RowId) -> Diagnostic {
	Diagnostic::new(
		ErrorKind::Conflict,
		"CNF_001",
		format!("row id {} has been changed since last read; please get the latest value for this row and try again", row),
	)
	.with_help("Re-read the row and retry with its current version or etag")
}
