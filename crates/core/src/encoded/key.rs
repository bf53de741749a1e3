// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::{
	fmt::{Debug, Formatter},
	ops::Deref,
};

#[derive(Clone, PartialOrd, Ord, Hash, PartialEq, Eq)]
pub struct EncodedKey(pub Vec<u8>);

impl EncodedKey {
	pub fn new(key: impl Into<Vec<u8>>) -> Self {
		Self(key.into())
	}

	pub fn as_slice(&self) -> &[u8] {
		&self.0
	}
}

impl Deref for EncodedKey {
	type Target = [u8];

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl AsRef<[u8]> for EncodedKey {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}

impl Debug for EncodedKey {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("0x")?;
		for byte in &self.0 {
			write!(f, "{:02x}", byte)?;
		}
		Ok(())
	}
}
