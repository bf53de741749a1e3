// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

//! Order-preserving binary encoding for metadata keys.
//!
//! * `u8`: as is.
//! * `u64`: big-endian.
//! * `i64`: big-endian with the sign bit flipped.
//! * `str`: `0x00` escaped as `0x00ff`, terminated with `0x0000`.

use crate::EncodedKey;

#[derive(Debug, Default)]
pub struct KeySerializer {
	buffer: Vec<u8>,
}

impl KeySerializer {
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			buffer: Vec::with_capacity(capacity),
		}
	}

	pub fn extend_u8(&mut self, value: impl Into<u8>) -> &mut Self {
		self.buffer.push(value.into());
		self
	}

	pub fn extend_u64(&mut self, value: impl Into<u64>) -> &mut Self {
		self.buffer.extend_from_slice(&value.into().to_be_bytes());
		self
	}

	pub fn extend_i64(&mut self, value: impl Into<i64>) -> &mut Self {
		let mut bytes = value.into().to_be_bytes();
		bytes[0] ^= 1 << 7;
		self.buffer.extend_from_slice(&bytes);
		self
	}

	pub fn extend_str(&mut self, value: &str) -> &mut Self {
		for &byte in value.as_bytes() {
			if byte == 0x00 {
				self.buffer.extend_from_slice(&[0x00, 0xff]);
			} else {
				self.buffer.push(byte);
			}
		}
		self.buffer.extend_from_slice(&[0x00, 0x00]);
		self
	}

	pub fn to_encoded_key(&self) -> EncodedKey {
		EncodedKey::new(self.buffer.clone())
	}

	pub fn finish(self) -> Vec<u8> {
		self.buffer
	}
}

#[derive(Debug)]
pub struct KeyDeserializer<'a> {
	input: &'a [u8],
}

impl<'a> KeyDeserializer<'a> {
	pub fn from_bytes(input: &'a [u8]) -> Self {
		Self {
			input,
		}
	}

	fn take(&mut self, len: usize) -> Option<&'a [u8]> {
		if self.input.len() < len {
			return None;
		}
		let (head, tail) = self.input.split_at(len);
		self.input = tail;
		Some(head)
	}

	pub fn read_u8(&mut self) -> Option<u8> {
		self.take(1).map(|b| b[0])
	}

	pub fn read_u64(&mut self) -> Option<u64> {
		let bytes: [u8; 8] = self.take(8)?.try_into().ok()?;
		Some(u64::from_be_bytes(bytes))
	}

	pub fn read_i64(&mut self) -> Option<i64> {
		let mut bytes: [u8; 8] = self.take(8)?.try_into().ok()?;
		bytes[0] ^= 1 << 7;
		Some(i64::from_be_bytes(bytes))
	}

	pub fn read_str(&mut self) -> Option<String> {
		let mut decoded = Vec::new();
		loop {
			match self.read_u8()? {
				0x00 => match self.read_u8()? {
					0x00 => break,
					0xff => decoded.push(0x00),
					_ => return None,
				},
				byte => decoded.push(byte),
			}
		}
		String::from_utf8(decoded).ok()
	}

	pub fn is_empty(&self) -> bool {
		self.input.is_empty()
	}
}
