// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use crate::{ErrorKind, TableId, UserId, error::diagnostic::Diagnostic};

/// The caller lacks write access to the table
pub fn write_access_denied(user: UserId, table: TableId) -> Diagnostic {
	Diagnostic::new(
		ErrorKind::Unauthorized,
		"AUTH_001",
		format!("user {} is not allowed to update table {}", user, table),
	)
	.with_help("Request edit permission on the table")
}
