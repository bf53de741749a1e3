// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::{
	fs,
	io::{self, ErrorKind},
	path::{Component, Path, PathBuf},
};

use tablelog_core::interface::BlobStore;
use tablelog_type::{Result, diagnostic::store::blob_error, error, return_error};
use tracing::instrument;

/// Blobs as files under `root/<bucket>/<key>`. Keys may contain `/`.
pub struct FileBlobStore {
	root: PathBuf,
}

impl FileBlobStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self {
			root: root.into(),
		}
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	fn path(&self, bucket: &str, key: &str) -> Result<PathBuf> {
		let relative = Path::new(bucket).join(key);
		if relative.components().any(|c| !matches!(c, Component::Normal(_))) {
			return_error!(blob_error(bucket, key, "key must be a relative path without '..'"));
		}
		Ok(self.root.join(relative))
	}
}

fn io_err(bucket: &str, key: &str, e: io::Error) -> tablelog_type::Error {
	error!(blob_error(bucket, key, e.to_string()))
}

impl BlobStore for FileBlobStore {
	#[instrument(name = "store::blob::put", level = "trace", skip(self, bytes), fields(len = bytes.len()))]
	fn put(&self, bucket: &str, key: &str, bytes: &[u8]) -> Result<()> {
		let path = self.path(bucket, key)?;
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).map_err(|e| io_err(bucket, key, e))?;
		}
		let staging = path.with_extension("partial");
		fs::write(&staging, bytes).map_err(|e| io_err(bucket, key, e))?;
		fs::rename(&staging, &path).map_err(|e| io_err(bucket, key, e))
	}

	fn get(&self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>> {
		let path = self.path(bucket, key)?;
		match fs::read(&path) {
			Ok(bytes) => Ok(Some(bytes)),
			Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
			Err(e) => Err(io_err(bucket, key, e)),
		}
	}

	fn delete(&self, bucket: &str, key: &str) -> Result<()> {
		let path = self.path(bucket, key)?;
		match fs::remove_file(&path) {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
			Err(e) => Err(io_err(bucket, key, e)),
		}
	}
}

#[cfg(test)]
mod tests {
	use tablelog_core::interface::BlobStore;
	use tablelog_testing::tempdir::temp_dir;

	use super::FileBlobStore;

	#[test]
	fn test_put_get_delete() {
		temp_dir(|dir| {
			let store = FileBlobStore::new(dir);
			store.put("tables", "1/abc", b"payload").unwrap();
			assert_eq!(store.get("tables", "1/abc").unwrap(), Some(b"payload".to_vec()));
			store.delete("tables", "1/abc").unwrap();
			assert_eq!(store.get("tables", "1/abc").unwrap(), None);
			store.delete("tables", "1/abc").unwrap();
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_rejects_escaping_keys() {
		temp_dir(|dir| {
			let store = FileBlobStore::new(dir);
			assert!(store.put("tables", "../escape", b"x").is_err());
			Ok(())
		})
		.unwrap();
	}
}
