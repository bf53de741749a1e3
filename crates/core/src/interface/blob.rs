// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use tablelog_type::Result;

/// Content store for large immutable payloads, addressed by bucket and key.
pub trait BlobStore: Send + Sync {
	fn put(&self, bucket: &str, key: &str, bytes: &[u8]) -> Result<()>;

	fn get(&self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>>;

	/// Deleting a missing key is not an error.
	fn delete(&self, bucket: &str, key: &str) -> Result<()>;
}
