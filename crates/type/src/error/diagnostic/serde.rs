// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use crate::{ErrorKind, error::diagnostic::Diagnostic};

pub fn serde_serialize_error(reason: impl Into<String>) -> Diagnostic {
	Diagnostic::new(ErrorKind::Internal, "SERDE_001", format!("serialization failed: {}", reason.into()))
}

pub fn serde_deserialize_error(reason: impl Into<String>) -> Diagnostic {
	Diagnostic::new(ErrorKind::Internal, "SERDE_002", format!("deserialization failed: {}", reason.into()))
}

pub fn compression_error(reason: impl Into<String>) -> Diagnostic {
	Diagnostic::new(ErrorKind::Internal, "SERDE_003", format!("compression failed: {}", reason.into()))
}
