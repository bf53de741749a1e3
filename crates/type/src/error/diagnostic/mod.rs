// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::fmt::{Display, Formatter};

use super::ErrorKind;

pub mod auth;
pub mod change;
pub mod conflict;
pub mod internal;
pub mod lock;
pub mod sequence;
pub mod serde;
pub mod store;
pub mod validation;
pub mod view;

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
	pub kind: ErrorKind,
	pub code: String,
	pub message: String,
	pub help: Option<String>,
	pub notes: Vec<String>,
	pub cause: Option<Box<Diagnostic>>,
}

impl Diagnostic {
	pub fn new(kind: ErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			kind,
			code: code.into(),
			message: message.into(),
			help: None,
			notes: vec![],
			cause: None,
		}
	}

	pub fn with_help(mut self, help: impl Into<String>) -> Self {
		self.help = Some(help.into());
		self
	}

	pub fn with_note(mut self, note: impl Into<String>) -> Self {
		self.notes.push(note.into());
		self
	}
}

impl Display for Diagnostic {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "[{}] {}", self.code, self.message)?;
		if let Some(help) = &self.help {
			write!(f, " (help: {})", help)?;
		}
		if let Some(cause) = &self.cause {
			write!(f, ": caused by {}", cause)?;
		}
		Ok(())
	}
}
