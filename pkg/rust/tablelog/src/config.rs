// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::{fs, path::Path};

use serde::Deserialize;
use tablelog_lock::LockConfig;
use tablelog_store::SqliteConfig;
use tablelog_sub_tracing::TracingConfig;
use tablelog_sub_worker::WorkerConfig;
use tablelog_type::{Result, error, diagnostic::serde::serde_deserialize_error, internal_err};
use tablelog_view::ViewConfig;

/// Where metadata is persisted.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "snake_case", tag = "backend")]
pub enum StorageConfig {
	#[default]
	Memory,
	Sqlite(SqliteConfig),
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BlobBackend {
	#[default]
	Memory,
	Filesystem {
		root: std::path::PathBuf,
	},
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BlobConfig {
	/// Bucket holding change payloads.
	pub bucket: String,
	pub backend: BlobBackend,
}

impl Default for BlobConfig {
	fn default() -> Self {
		Self {
			bucket: "table-changes".to_string(),
			backend: BlobBackend::default(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
	pub storage: StorageConfig,
	pub blob: BlobConfig,
	pub lock: LockConfig,
	pub worker: WorkerConfig,
	pub view: ViewConfig,
	/// Installs a global tracing subscriber on build when set.
	pub tracing: Option<TracingConfig>,
}

impl ServiceConfig {
	pub fn from_json(json: &str) -> Result<Self> {
		serde_json::from_str(json).map_err(|err| error!(serde_deserialize_error(err.to_string())))
	}

	pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		match fs::read_to_string(path) {
			Ok(json) => Self::from_json(&json),
			Err(err) => internal_err!("failed to read config {}: {}", path.display(), err),
		}
	}

	pub fn with_storage(mut self, storage: StorageConfig) -> Self {
		self.storage = storage;
		self
	}

	pub fn with_blob(mut self, blob: BlobConfig) -> Self {
		self.blob = blob;
		self
	}

	pub fn with_lock(mut self, lock: LockConfig) -> Self {
		self.lock = lock;
		self
	}

	pub fn with_worker(mut self, worker: WorkerConfig) -> Self {
		self.worker = worker;
		self
	}

	pub fn with_view(mut self, view: ViewConfig) -> Self {
		self.view = view;
		self
	}

	pub fn with_tracing(mut self, tracing: TracingConfig) -> Self {
		self.tracing = Some(tracing);
		self
	}
}
