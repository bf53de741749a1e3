// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use crate::{ErrorKind, TableId, error::diagnostic::Diagnostic};

/// A dependency of the view failed its own index build
pub fn dependency_failed(view: TableId, dependency: TableId, reason: Option<&str>) -> Diagnostic {
	let mut diagnostic = Diagnostic::new(
		ErrorKind::DependencyFailed,
		"VIEW_001",
		format!("dependency {} of view {} failed to build", dependency, view),
	)
	.with_help("Repair and rebuild the dependency first");
	if let Some(reason) = reason {
		diagnostic = diagnostic.with_note(format!("dependency failure: {}", reason));
	}
	diagnostic
}

/// No definition is registered for the view
pub fn view_not_found(view: TableId) -> Diagnostic {
	Diagnostic::new(ErrorKind::NotFound, "VIEW_002", format!("view {} has no registered defining query", view))
}

/// No index status exists for the table or view
pub fn index_status_not_found(target: TableId) -> Diagnostic {
	Diagnostic::new(ErrorKind::NotFound, "VIEW_003", format!("no index status exists for {}", target))
}

/// A view may not depend on itself
pub fn self_dependency(view: TableId) -> Diagnostic {
	Diagnostic::new(ErrorKind::Validation, "VIEW_004", format!("view {} references itself", view))
}

/// The physical index of a table or view does not exist
pub fn index_not_found(target: TableId) -> Diagnostic {
	Diagnostic::new(ErrorKind::NotFound, "VIEW_005", format!("no physical index exists for {}", target))
}

/// An ephemeral snapshot was used after it was dropped
pub fn snapshot_not_found(snapshot: u64) -> Diagnostic {
	Diagnostic::new(ErrorKind::Internal, "VIEW_006", format!("snapshot {} does not exist", snapshot))
}
