// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::{collections::BTreeSet, sync::Arc};

use tablelog_catalog::StatusCatalog;
use tablelog_core::{
	interface::{AccessControl, IndexEngine},
	model::{
		ChangeRecord, ColumnModel, IndexStatus, RowReference, RowSelection, RowSet, SchemaChangeRequest, SchemaChangeSet,
		SparseChangeSet, TableChange, TableChangeResult, ViewDefinition,
	},
};
use tablelog_lock::{LockKey, LockService};
use tablelog_sub_worker::{PoolStats, WorkerPool};
use tablelog_transaction::TransactionCoordinator;
use tablelog_type::{
	Etag, Result, RowId, TableId, UserId, Version,
	diagnostic::auth::write_access_denied,
	return_error, return_internal_error,
};
use tablelog_view::{BuildOutcome, TableIndexUpdater, ViewBuilder, ViewDependencyManager};
use tracing::{info, instrument, warn};

use crate::ServiceConfig;

/// Versioned table storage with derived views.
///
/// Writes go through the [`TransactionCoordinator`]; every commit marks the
/// table index and its dependent views processing and hands the rebuilds to a
/// background [`WorkerPool`].
pub struct TableService {
	coordinator: TransactionCoordinator,
	dependencies: Arc<ViewDependencyManager>,
	tables: Arc<TableIndexUpdater>,
	views: Arc<ViewBuilder>,
	pool: Arc<WorkerPool>,
	access: Arc<dyn AccessControl>,
	locks: Arc<dyn LockService>,
	index: Arc<dyn IndexEngine>,
	config: ServiceConfig,
}

impl TableService {
	#[allow(clippy::too_many_arguments)]
	pub(crate) fn new(
		coordinator: TransactionCoordinator,
		dependencies: Arc<ViewDependencyManager>,
		tables: Arc<TableIndexUpdater>,
		views: Arc<ViewBuilder>,
		pool: Arc<WorkerPool>,
		access: Arc<dyn AccessControl>,
		locks: Arc<dyn LockService>,
		index: Arc<dyn IndexEngine>,
		config: ServiceConfig,
	) -> Self {
		Self {
			coordinator,
			dependencies,
			tables,
			views,
			pool,
			access,
			locks,
			index,
			config,
		}
	}

	pub fn config(&self) -> &ServiceConfig {
		&self.config
	}

	pub fn update_table_with_transaction(
		&self,
		user: UserId,
		table: TableId,
		changes: Vec<TableChange>,
	) -> Result<Vec<TableChangeResult>> {
		self.coordinator.update_table_with_transaction(user, table, changes)
	}

	pub fn append_rows(&self, user: UserId, table: TableId, rows: RowSet) -> Result<Vec<RowReference>> {
		self.single_rows(user, table, TableChange::AppendRows(rows))
	}

	pub fn append_partial_rows(&self, user: UserId, table: TableId, rows: SparseChangeSet) -> Result<Vec<RowReference>> {
		self.single_rows(user, table, TableChange::AppendPartialRows(rows))
	}

	/// Deletes rows last read at `etag`.
	pub fn delete_rows(&self, user: UserId, table: TableId, etag: Etag, rows: Vec<RowId>) -> Result<Vec<RowReference>> {
		self.single_rows(
			user,
			table,
			TableChange::DeleteRows(RowSelection {
				etag: Some(etag),
				row_ids: rows,
			}),
		)
	}

	/// Returns the new version and the resulting ordered columns.
	pub fn append_schema_change(
		&self,
		user: UserId,
		table: TableId,
		request: SchemaChangeRequest,
	) -> Result<(Version, Vec<ColumnModel>)> {
		match self.single(user, table, TableChange::SchemaChange(request))? {
			TableChangeResult::Schema {
				version,
				columns,
			} => Ok((version, columns)),
			TableChangeResult::Rows(_) => return_internal_error!("schema change produced row references"),
		}
	}

	/// Removes the table's whole history, its sequence and its index. The
	/// now empty table index and its dependent views are scheduled for a
	/// rebuild.
	#[instrument(name = "service::delete_all_rows", level = "debug", skip(self), fields(table = %table, user = %user))]
	pub fn delete_all_rows(&self, user: UserId, table: TableId) -> Result<usize> {
		if !self.access.can_write(user, table)? {
			return_error!(write_access_denied(user, table));
		}

		let deleted = {
			let _lock = self.locks.exclusive(LockKey::Table(table), self.config.lock.table_timeout)?;
			let mut txn = self.coordinator.store().begin_command();
			let deleted = self.coordinator.changes().delete_all(&mut txn, table)?;
			txn.commit()?;
			deleted
		};

		{
			let _lock = self.locks.exclusive(LockKey::Index(table), self.config.lock.index_timeout)?;
			self.index.drop_index(table)?;
			let mut txn = self.coordinator.store().begin_command();
			StatusCatalog::delete(&mut txn, table)?;
			txn.commit()?;
		}

		if let Err(err) = self.dependencies.on_table_changed(table) {
			warn!(error = %err, "failed to schedule index rebuilds");
		}
		info!(deleted, "deleted all rows");
		Ok(deleted)
	}

	/// Changes in version order, or only those after `since`.
	pub fn list_changes(&self, table: TableId, since: Option<Version>) -> Result<Vec<ChangeRecord>> {
		self.coordinator.changes().list_changes(self.coordinator.store(), table, since)
	}

	pub fn get_change_for_version(&self, table: TableId, version: Version) -> Result<ChangeRecord> {
		self.coordinator.changes().get_change(self.coordinator.store(), table, version)
	}

	pub fn get_row_set(&self, table: TableId, version: Version) -> Result<SparseChangeSet> {
		self.coordinator.changes().get_row_set(self.coordinator.store(), table, version)
	}

	pub fn get_schema_change(&self, table: TableId, version: Version) -> Result<SchemaChangeSet> {
		self.coordinator.changes().get_schema_change(self.coordinator.store(), table, version)
	}

	pub fn version_for_etag(&self, table: TableId, etag: &Etag) -> Result<Version> {
		self.coordinator.changes().version_for_etag(self.coordinator.store(), table, etag)
	}

	pub fn last_change(&self, table: TableId) -> Result<Option<ChangeRecord>> {
		self.coordinator.changes().last_change(self.coordinator.store(), table)
	}

	pub fn register_source_tables(&self, view: TableId, defining_query: &str) -> Result<ViewDefinition> {
		self.dependencies.register_source_tables(view, defining_query)
	}

	pub fn register_defining_query(&self, view: TableId, defining_query: &str) -> Result<ViewDefinition> {
		self.dependencies.register_defining_query(view, defining_query)
	}

	pub fn view_sources(&self, view: TableId) -> Result<BTreeSet<TableId>> {
		self.dependencies.sources(view)
	}

	/// Forgets the view's dependencies and drops its index.
	pub fn unregister_view(&self, view: TableId) -> Result<()> {
		self.dependencies.unregister(view)?;
		self.views.delete_view_index(view)
	}

	pub fn create_or_update_view_index(&self, view: TableId) -> Result<BuildOutcome> {
		self.views.create_or_update_view_index(view)
	}

	pub fn delete_view_index(&self, view: TableId) -> Result<()> {
		self.views.delete_view_index(view)
	}

	/// Replays pending changes onto the table index; returns how many were applied.
	pub fn update_table_index(&self, table: TableId) -> Result<usize> {
		self.tables.update_table_index(table)
	}

	pub fn index_status(&self, target: TableId) -> Result<Option<IndexStatus>> {
		StatusCatalog::get(self.coordinator.store(), target)
	}

	pub fn worker_stats(&self) -> PoolStats {
		self.pool.stats()
	}

	/// True when no rebuild is queued, running or waiting for a retry.
	pub fn is_idle(&self) -> bool {
		self.pool.is_idle()
	}

	pub fn shutdown(&self) {
		self.pool.stop();
	}

	fn single(&self, user: UserId, table: TableId, change: TableChange) -> Result<TableChangeResult> {
		match self.coordinator.update_table_with_transaction(user, table, vec![change])?.pop() {
			Some(result) => Ok(result),
			None => return_internal_error!("transaction on table {} returned no result", table),
		}
	}

	fn single_rows(&self, user: UserId, table: TableId, change: TableChange) -> Result<Vec<RowReference>> {
		match self.single(user, table, change)? {
			TableChangeResult::Rows(rows) => Ok(rows),
			TableChangeResult::Schema {
				..
			} => return_internal_error!("row change produced a schema result"),
		}
	}
}

impl Drop for TableService {
	fn drop(&mut self) {
		self.pool.stop();
	}
}
