// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::hash::{Hash, Hasher};

use tablelog_core::model::{ColumnModel, IndexStatus};
use tablelog_type::{ColumnId, Etag, TableId};
use xxhash_rust::xxh3::Xxh3;

fn hash(value: impl Hash) -> u64 {
	let mut hasher = Xxh3::default();
	value.hash(&mut hasher);
	hasher.finish()
}

/// Checksum of a table index schema: its ordered column ids.
pub(crate) fn column_ids(columns: &[ColumnId]) -> u64 {
	hash(columns)
}

/// Checksum of a view schema, sensitive to column order and types.
pub(crate) fn columns(columns: &[ColumnModel]) -> u64 {
	hash(columns)
}

/// Checksum of a table index source: the etag of the last change applied,
/// `None` for a table without history. Etags are never reused, so a table
/// whose history restarts never repeats a checksum.
pub(crate) fn etag(etag: Option<&Etag>) -> u64 {
	hash(etag)
}

/// Checksum of everything a view index is computed from: the defining query
/// and the built state of each dependency.
pub(crate) fn sources(query: &str, dependencies: &[(TableId, IndexStatus)]) -> u64 {
	let mut hasher = Xxh3::default();
	query.hash(&mut hasher);
	for (dependency, status) in dependencies {
		dependency.hash(&mut hasher);
		status.schema_checksum.hash(&mut hasher);
		status.source_checksum.hash(&mut hasher);
	}
	hasher.finish()
}
