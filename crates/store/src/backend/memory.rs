// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::{collections::BTreeMap, ops::Bound, sync::Arc};

use parking_lot::RwLock;
use tablelog_type::Result;
use tracing::instrument;

use super::{PrimitiveStorage, RawEntry};

/// Non-persistent storage over a shared ordered map.
#[derive(Clone, Default)]
pub struct MemoryPrimitiveStorage {
	inner: Arc<RwLock<BTreeMap<Vec<u8>, Vec<u8>>>>,
}

impl MemoryPrimitiveStorage {
	pub fn new() -> Self {
		Self::default()
	}
}

impl PrimitiveStorage for MemoryPrimitiveStorage {
	fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
		Ok(self.inner.read().get(key).cloned())
	}

	#[instrument(name = "store::memory::apply", level = "trace", skip_all, fields(entries = batch.len()))]
	fn apply(&self, batch: &[(Vec<u8>, Option<Vec<u8>>)]) -> Result<()> {
		let mut map = self.inner.write();
		for (key, value) in batch {
			match value {
				Some(value) => {
					map.insert(key.clone(), value.clone());
				}
				None => {
					map.remove(key);
				}
			}
		}
		Ok(())
	}

	fn range(&self, start: Bound<&[u8]>, end: Bound<&[u8]>) -> Result<Vec<RawEntry>> {
		let map = self.inner.read();
		Ok(map.range::<[u8], _>((start, end))
			.map(|(key, value)| RawEntry {
				key: key.clone(),
				value: value.clone(),
			})
			.collect())
	}

	fn clear(&self) -> Result<()> {
		self.inner.write().clear();
		Ok(())
	}
}
