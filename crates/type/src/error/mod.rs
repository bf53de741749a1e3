// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::fmt::{Display, Formatter};

pub mod diagnostic;

pub use diagnostic::Diagnostic;
use serde::{Deserialize, Serialize};

/// Coarse classification of a failure, used by callers to decide whether to
/// retry, re-read or give up.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
	/// Metadata store failure while locking or updating a sequence.
	Allocation,
	/// Row-level write/write conflict.
	Conflict,
	/// A lock was not obtained in time, or a dependency is still being built.
	LockUnavailable,
	/// Invalid schema, rows or query. Raised before any mutation.
	Validation,
	/// A source table's own index build failed.
	DependencyFailed,
	/// Referenced table, version or etag does not exist.
	NotFound,
	/// The caller may not write to the target.
	Unauthorized,
	/// Storage, codec or other unexpected failure.
	Internal,
}

impl ErrorKind {
	pub fn is_retryable(&self) -> bool {
		matches!(self, ErrorKind::LockUnavailable)
	}
}

impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			ErrorKind::Allocation => "allocation",
			ErrorKind::Conflict => "conflict",
			ErrorKind::LockUnavailable => "lock unavailable",
			ErrorKind::Validation => "validation",
			ErrorKind::DependencyFailed => "dependency failed",
			ErrorKind::NotFound => "not found",
			ErrorKind::Unauthorized => "unauthorized",
			ErrorKind::Internal => "internal",
		};
		f.write_str(name)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Error(pub Box<Diagnostic>);

impl Error {
	pub fn new(diagnostic: Diagnostic) -> Self {
		Self(Box::new(diagnostic))
	}

	pub fn kind(&self) -> ErrorKind {
		self.0.kind
	}

	pub fn code(&self) -> &str {
		&self.0.code
	}

	pub fn is_retryable(&self) -> bool {
		self.0.kind.is_retryable()
	}

	pub fn diagnostic(&self) -> &Diagnostic {
		&self.0
	}

	pub fn into_diagnostic(self) -> Diagnostic {
		*self.0
	}

	/// Wraps this error as the cause of `outer`.
	pub fn with_context(self, mut outer: Diagnostic) -> Self {
		outer.cause = Some(self.0);
		Self::new(outer)
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		Display::fmt(&self.0, f)
	}
}

impl std::error::Error for Error {}

impl From<Diagnostic> for Error {
	fn from(diagnostic: Diagnostic) -> Self {
		Self::new(diagnostic)
	}
}

#[macro_export]
macro_rules! error {
	($diagnostic:expr) => {
		$crate::Error::new($diagnostic)
	};
}

#[macro_export]
macro_rules! err {
	($diagnostic:expr) => {
		Err($crate::error!($diagnostic))
	};
}

#[macro_export]
macro_rules! return_error {
	($diagnostic:expr) => {
		return $crate::err!($diagnostic)
	};
}

#[macro_export]
macro_rules! internal_err {
	($($arg:tt)*) => {
		$crate::err!($crate::diagnostic::internal::internal(format!($($arg)*)))
	};
}

#[macro_export]
macro_rules! return_internal_error {
	($($arg:tt)*) => {
		return $crate::internal_err!($($arg)*)
	};
}
