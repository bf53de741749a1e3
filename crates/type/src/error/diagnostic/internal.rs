// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use crate::{ErrorKind, error::diagnostic::Diagnostic};

pub fn internal(reason: impl Into<String>) -> Diagnostic {
	Diagnostic::new(ErrorKind::Internal, "INTERNAL_001", format!("internal error: {}", reason.into()))
		.with_help("This is a bug; please report it")
}
