// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::sync::Arc;

use tablelog_catalog::ChangeLogStore;
use tablelog_core::interface::{AccessControl, BlobStore, IndexEngine, SchemaProvider, SqlTranslator};
use tablelog_lock::{LockService, MemoryLockService};
use tablelog_store::{BackendStorage, FileBlobStore, MemoryBlobStore, MetadataStore};
use tablelog_sub_tracing::TracingBuilder;
use tablelog_sub_worker::WorkerPool;
use tablelog_transaction::TransactionCoordinator;
use tablelog_type::{Result, TableId, UserId};
use tablelog_view::{RebuildExecutor, TableIndexUpdater, ViewBuilder, ViewDependencyManager};
use tracing::{info, warn};

use crate::{BlobBackend, ServiceConfig, StorageConfig, TableService};

/// Grants every write; used when no access control is configured.
struct OpenAccess;

impl AccessControl for OpenAccess {
	fn can_write(&self, _user: UserId, _table: TableId) -> Result<bool> {
		Ok(true)
	}
}

/// Wires a [`TableService`] from its external collaborators and a
/// [`ServiceConfig`].
pub struct TableServiceBuilder {
	config: ServiceConfig,
	schema: Arc<dyn SchemaProvider>,
	translator: Arc<dyn SqlTranslator>,
	index: Arc<dyn IndexEngine>,
	access: Option<Arc<dyn AccessControl>>,
	blobs: Option<Arc<dyn BlobStore>>,
	locks: Option<Arc<dyn LockService>>,
}

impl TableServiceBuilder {
	pub fn new(
		schema: Arc<dyn SchemaProvider>,
		translator: Arc<dyn SqlTranslator>,
		index: Arc<dyn IndexEngine>,
	) -> Self {
		Self {
			config: ServiceConfig::default(),
			schema,
			translator,
			index,
			access: None,
			blobs: None,
			locks: None,
		}
	}

	pub fn with_config(mut self, config: ServiceConfig) -> Self {
		self.config = config;
		self
	}

	pub fn with_access_control(mut self, access: Arc<dyn AccessControl>) -> Self {
		self.access = Some(access);
		self
	}

	/// Overrides the blob store selected by the configuration.
	pub fn with_blob_store(mut self, blobs: Arc<dyn BlobStore>) -> Self {
		self.blobs = Some(blobs);
		self
	}

	pub fn with_lock_service(mut self, locks: Arc<dyn LockService>) -> Self {
		self.locks = Some(locks);
		self
	}

	pub fn config(&self) -> &ServiceConfig {
		&self.config
	}

	pub fn build(self) -> Result<TableService> {
		let config = self.config;

		if let Some(tracing) = &config.tracing {
			if let Err(err) = TracingBuilder::from_config(tracing.clone()).init() {
				warn!(error = %err, "tracing subscriber not installed");
			}
		}

		let storage = match &config.storage {
			StorageConfig::Memory => BackendStorage::memory(),
			StorageConfig::Sqlite(sqlite) => BackendStorage::sqlite(sqlite.clone())?,
		};
		let store = MetadataStore::new(storage, config.lock.row_timeout);

		let blobs: Arc<dyn BlobStore> = match self.blobs {
			Some(blobs) => blobs,
			None => match &config.blob.backend {
				BlobBackend::Memory => Arc::new(MemoryBlobStore::new()),
				BlobBackend::Filesystem {
					root,
				} => Arc::new(FileBlobStore::new(root.clone())),
			},
		};
		let changes = ChangeLogStore::new(blobs, config.blob.bucket.clone());
		let locks = self.locks.unwrap_or_else(|| Arc::new(MemoryLockService::new()));
		let access = self.access.unwrap_or_else(|| Arc::new(OpenAccess));

		let pool = Arc::new(WorkerPool::new(config.worker.clone()));
		let dependencies = Arc::new(ViewDependencyManager::new(
			store.clone(),
			self.translator.clone(),
			self.schema.clone(),
			pool.clone(),
			config.view.clone(),
		));

		let mut coordinator = TransactionCoordinator::new(
			store.clone(),
			changes.clone(),
			self.schema.clone(),
			access.clone(),
			self.index.clone(),
			locks.clone(),
			config.lock.table_timeout,
		);
		coordinator.add_post_commit(dependencies.clone());

		let tables = Arc::new(TableIndexUpdater::new(
			store.clone(),
			changes,
			self.schema.clone(),
			self.index.clone(),
			locks.clone(),
			config.lock.index_timeout,
			dependencies.clone(),
		));
		let views = Arc::new(ViewBuilder::new(
			store,
			self.translator,
			self.schema,
			self.index.clone(),
			locks.clone(),
			config.lock.index_timeout,
		));
		pool.start(Arc::new(RebuildExecutor::new(tables.clone(), views.clone())))?;

		info!(threads = config.worker.threads, "table service started");
		Ok(TableService::new(coordinator, dependencies, tables, views, pool, access, locks, self.index, config))
	}
}
