// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::ops::Bound;

use tablelog_type::Result;

mod memory;
mod primitive;
mod sqlite;

pub use memory::MemoryPrimitiveStorage;
pub use primitive::{PrimitiveStorage, RawEntry};
pub use sqlite::{DbPath, SqliteConfig, SqlitePrimitiveStorage};

/// Dispatches to the configured storage backend.
#[derive(Clone)]
pub enum BackendStorage {
	Memory(MemoryPrimitiveStorage),
	Sqlite(SqlitePrimitiveStorage),
}

impl BackendStorage {
	pub fn memory() -> Self {
		Self::Memory(MemoryPrimitiveStorage::new())
	}

	pub fn sqlite_in_memory() -> Result<Self> {
		Ok(Self::Sqlite(SqlitePrimitiveStorage::in_memory()?))
	}

	pub fn sqlite(config: SqliteConfig) -> Result<Self> {
		Ok(Self::Sqlite(SqlitePrimitiveStorage::new(config)?))
	}
}

impl PrimitiveStorage for BackendStorage {
	#[inline]
	fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
		match self {
			Self::Memory(s) => s.get(key),
			Self::Sqlite(s) => s.get(key),
		}
	}

	#[inline]
	fn apply(&self, batch: &[(Vec<u8>, Option<Vec<u8>>)]) -> Result<()> {
		match self {
			Self::Memory(s) => s.apply(batch),
			Self::Sqlite(s) => s.apply(batch),
		}
	}

	#[inline]
	fn range(&self, start: Bound<&[u8]>, end: Bound<&[u8]>) -> Result<Vec<RawEntry>> {
		match self {
			Self::Memory(s) => s.range(start, end),
			Self::Sqlite(s) => s.range(start, end),
		}
	}

	#[inline]
	fn clear(&self) -> Result<()> {
		match self {
			Self::Memory(s) => s.clear(),
			Self::Sqlite(s) => s.clear(),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::ops::Bound;

	use tablelog_testing::tempdir::temp_dir;

	use super::{BackendStorage, PrimitiveStorage, SqliteConfig};

	fn exercise(storage: BackendStorage) {
		storage.apply(&[
			(b"a".to_vec(), Some(b"1".to_vec())),
			(b"b".to_vec(), Some(b"2".to_vec())),
			(b"c".to_vec(), Some(b"3".to_vec())),
		])
		.unwrap();
		assert_eq!(storage.get(b"b").unwrap(), Some(b"2".to_vec()));
		assert!(storage.contains(b"c").unwrap());

		storage.apply(&[(b"b".to_vec(), None), (b"c".to_vec(), Some(b"30".to_vec()))]).unwrap();
		assert_eq!(storage.get(b"b").unwrap(), None);

		let entries = storage.range(Bound::Excluded(b"a".as_slice()), Bound::Unbounded).unwrap();
		assert_eq!(entries.len(), 1);
		assert_eq!(entries[0].key, b"c".to_vec());
		assert_eq!(entries[0].value, b"30".to_vec());

		let entries = storage.range(Bound::Unbounded, Bound::Included(b"c".as_slice())).unwrap();
		assert_eq!(entries.iter().map(|e| e.key.clone()).collect::<Vec<_>>(), vec![b"a".to_vec(), b"c".to_vec()]);

		storage.clear().unwrap();
		assert!(storage.range(Bound::Unbounded, Bound::Unbounded).unwrap().is_empty());
	}

	#[test]
	fn test_memory_backend() {
		exercise(BackendStorage::memory());
	}

	#[test]
	fn test_sqlite_backend() {
		exercise(BackendStorage::sqlite_in_memory().unwrap());
	}

	#[test]
	fn test_sqlite_file_persists() {
		temp_dir(|dir| {
			let path = dir.join("meta.db");
			{
				let storage = BackendStorage::sqlite(SqliteConfig::file(&path)).unwrap();
				storage.apply(&[(b"k".to_vec(), Some(b"v".to_vec()))]).unwrap();
			}
			let storage = BackendStorage::sqlite(SqliteConfig::file(&path)).unwrap();
			assert_eq!(storage.get(b"k").unwrap(), Some(b"v".to_vec()));
			Ok(())
		})
		.unwrap();
	}
}
