// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

mod change;
mod change_etag;
mod index_status;
pub mod keycode;
mod sequence;
mod source_view;
mod view_definition;
mod view_source;

pub use change::ChangeKey;
pub use change_etag::ChangeEtagKey;
pub use index_status::IndexStatusKey;
pub use sequence::SequenceKey;
pub use source_view::SourceViewKey;
pub use view_definition::ViewDefinitionKey;
pub use view_source::ViewSourceKey;

use crate::EncodedKey;

pub(crate) const VERSION: u8 = 1;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum KeyKind {
	Sequence = 0x01,
	Change = 0x02,
	ChangeEtag = 0x03,
	ViewDefinition = 0x04,
	IndexStatus = 0x05,
	ViewSource = 0x06,
	SourceView = 0x07,
}

impl From<KeyKind> for u8 {
	fn from(kind: KeyKind) -> Self {
		kind as u8
	}
}

impl TryFrom<u8> for KeyKind {
	type Error = ();

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			0x01 => Ok(Self::Sequence),
			0x02 => Ok(Self::Change),
			0x03 => Ok(Self::ChangeEtag),
			0x04 => Ok(Self::ViewDefinition),
			0x05 => Ok(Self::IndexStatus),
			0x06 => Ok(Self::ViewSource),
			0x07 => Ok(Self::SourceView),
			_ => Err(()),
		}
	}
}

pub trait EncodableKey: Sized {
	const KIND: KeyKind;

	fn encode(&self) -> EncodedKey;

	fn decode(key: &EncodedKey) -> Option<Self>;
}

/// Reads and checks the version/kind header shared by every key.
pub(crate) fn read_header(de: &mut keycode::KeyDeserializer<'_>, kind: KeyKind) -> Option<()> {
	if de.read_u8()? != VERSION {
		return None;
	}
	let actual: KeyKind = de.read_u8()?.try_into().ok()?;
	(actual == kind).then_some(())
}

pub(crate) fn header(kind: KeyKind, capacity: usize) -> keycode::KeySerializer {
	let mut serializer = keycode::KeySerializer::with_capacity(capacity);
	serializer.extend_u8(VERSION).extend_u8(kind);
	serializer
}
