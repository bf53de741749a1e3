// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::time::Duration;

use crate::{ErrorKind, TableId, error::diagnostic::Diagnostic};

/// A named lock could not be acquired within its timeout
pub fn lock_timeout(name: &str, timeout: Duration) -> Diagnostic {
	Diagnostic::new(
		ErrorKind::LockUnavailable,
		"LCK_001",
		format!("lock '{}' was not acquired within {:?}", name, timeout),
	)
	.with_help("The resource is busy; retry later")
}

/// A dependency of a view is still being built
pub fn dependency_processing(view: TableId, dependency: TableId) -> Diagnostic {
	Diagnostic::new(
		ErrorKind::LockUnavailable,
		"LCK_002",
		format!("dependency {} of view {} is still being built", dependency, view),
	)
	.with_help("Retry once the dependency is available")
}
