// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use crate::{ErrorKind, TableId, error::diagnostic::Diagnostic};

/// The metadata store failed while locking or updating a sequence record
pub fn allocation_failed(table: TableId, reason: impl Into<String>) -> Diagnostic {
	Diagnostic::new(
		ErrorKind::Allocation,
		"SEQ_001",
		format!("failed to reserve row ids for table {}: {}", table, reason.into()),
	)
}

/// Reserving more ids would overflow the row id space
pub fn sequence_exhausted(table: TableId, count: u64) -> Diagnostic {
	Diagnostic::new(
		ErrorKind::Allocation,
		"SEQ_002",
		format!("cannot reserve {} more row ids for table {}", count, table),
	)
	.with_help("The row id space of this table is exhausted")
}
