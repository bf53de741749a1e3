// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use crate::{ErrorKind, error::diagnostic::Diagnostic};

/// The metadata store failed
pub fn store_error(reason: impl Into<String>) -> Diagnostic {
	Diagnostic::new(ErrorKind::Internal, "STORE_001", format!("metadata store error: {}", reason.into()))
		.with_help("Check metadata store configuration and availability")
}

/// The blob store failed
pub fn blob_error(bucket: &str, key: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic::new(
		ErrorKind::Internal,
		"STORE_002",
		format!("blob store error for {}/{}: {}", bucket, key, reason.into()),
	)
}

/// A transaction was used after commit or rollback
pub fn transaction_finished() -> Diagnostic {
	Diagnostic::new(ErrorKind::Internal, "STORE_003", "transaction has already been committed or rolled back")
		.with_help("Begin a new transaction")
}
