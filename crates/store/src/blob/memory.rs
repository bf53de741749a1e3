// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::collections::HashMap;

use parking_lot::RwLock;
use tablelog_core::interface::BlobStore;
use tablelog_type::Result;

#[derive(Default)]
pub struct MemoryBlobStore {
	blobs: RwLock<HashMap<(String, String), Vec<u8>>>,
}

impl MemoryBlobStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.blobs.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.blobs.read().is_empty()
	}
}

impl BlobStore for MemoryBlobStore {
	fn put(&self, bucket: &str, key: &str, bytes: &[u8]) -> Result<()> {
		self.blobs.write().insert((bucket.to_string(), key.to_string()), bytes.to_vec());
		Ok(())
	}

	fn get(&self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>> {
		Ok(self.blobs.read().get(&(bucket.to_string(), key.to_string())).cloned())
	}

	fn delete(&self, bucket: &str, key: &str) -> Result<()> {
		self.blobs.write().remove(&(bucket.to_string(), key.to_string()));
		Ok(())
	}
}
