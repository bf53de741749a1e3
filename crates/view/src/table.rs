// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::{sync::Arc, time::Duration};

use tablelog_catalog::{ChangeLogStore, StatusCatalog};
use tablelog_core::{
	interface::{IndexEngine, SchemaProvider},
	model::{ChangeType, IndexState, IndexStatus},
	util::now_millis,
};
use tablelog_lock::{LockKey, LockService};
use tablelog_store::MetadataStore;
use tablelog_type::{ColumnId, Result, TableId, Version};
use tracing::{debug, info, instrument, warn};

use crate::{ViewDependencyManager, checksum};

/// Brings a table's physical index up to date with its change log.
pub struct TableIndexUpdater {
	store: MetadataStore,
	changes: ChangeLogStore,
	schema: Arc<dyn SchemaProvider>,
	index: Arc<dyn IndexEngine>,
	locks: Arc<dyn LockService>,
	lock_timeout: Duration,
	dependencies: Arc<ViewDependencyManager>,
}

struct Update {
	applied: usize,
	/// The index moved to available, from another state or by replaying.
	advanced: bool,
}

impl TableIndexUpdater {
	pub fn new(
		store: MetadataStore,
		changes: ChangeLogStore,
		schema: Arc<dyn SchemaProvider>,
		index: Arc<dyn IndexEngine>,
		locks: Arc<dyn LockService>,
		lock_timeout: Duration,
		dependencies: Arc<ViewDependencyManager>,
	) -> Self {
		Self {
			store,
			changes,
			schema,
			index,
			locks,
			lock_timeout,
			dependencies,
		}
	}

	/// Replays every change newer than the last applied version onto the
	/// table index, creating the index first if it does not exist. Returns
	/// the number of changes applied.
	///
	/// Replaying from the last recorded version is idempotent, so a failed
	/// update is simply run again. Whenever the index advances, dependent
	/// views are scheduled for a rebuild.
	#[instrument(name = "view::update_table_index", level = "debug", skip(self), fields(table = %table))]
	pub fn update_table_index(&self, table: TableId) -> Result<usize> {
		let update = {
			let _lock = self.locks.exclusive(LockKey::Index(table), self.lock_timeout)?;
			match self.update(table) {
				Ok(update) => update,
				Err(err) if err.is_retryable() => return Err(err),
				Err(err) => {
					let result = (|| {
						let mut txn = self.store.begin_command();
						StatusCatalog::mark(&mut txn, table, IndexState::Failed, Some(err.to_string()))?;
						txn.commit()
					})();
					if let Err(mark) = result {
						warn!(mark_error = %mark, "failed to record table index failure");
					}
					warn!(error = %err, "table index update failed");
					return Err(err);
				}
			}
		};

		if update.advanced {
			if let Err(err) = self.dependencies.refresh_dependent_materialized_views(table) {
				warn!(error = %err, "failed to schedule dependent views");
			}
		}
		Ok(update.applied)
	}

	fn update(&self, table: TableId) -> Result<Update> {
		let current = StatusCatalog::get(&self.store, table)?;
		let mut applied = current.as_ref().map(|s| s.applied_version).unwrap_or(Version::NONE);

		if !self.index.exists(table)? {
			self.index.create_index(table, &self.schema.current_schema(table)?)?;
			applied = Version::NONE;
		}

		let mut replayed = 0;
		loop {
			replayed += self.replay(table, &mut applied)?;

			let mut txn = self.store.begin_command();
			let status = StatusCatalog::get_for_update(&mut txn, table)?;
			let last = self.changes.last_change(&txn, table)?;
			if last.as_ref().is_some_and(|record| record.version > applied) {
				// committed while replaying
				continue;
			}

			let column_ids: Vec<ColumnId> = self.schema.current_schema(table)?.iter().map(|c| c.id).collect();
			let now = now_millis();
			let was_available = status.as_ref().is_some_and(IndexStatus::is_available);
			let mut status = status.unwrap_or_else(|| IndexStatus::pending(table, now));
			status.state = IndexState::Available;
			status.applied_version = applied;
			status.source_checksum = Some(checksum::etag(last.as_ref().map(|record| &record.etag)));
			status.schema_checksum = Some(checksum::column_ids(&column_ids));
			status.diagnostic = None;
			status.changed_on = now;
			StatusCatalog::set(&mut txn, &status)?;
			txn.commit()?;

			if replayed == 0 {
				debug!(applied = %applied, "table index up to date");
			} else {
				info!(changes = replayed, applied = %applied, "updated table index");
			}
			return Ok(Update {
				applied: replayed,
				advanced: replayed > 0 || !was_available,
			});
		}
	}

	/// Applies the changes after `applied` in version order, advancing it.
	fn replay(&self, table: TableId, applied: &mut Version) -> Result<usize> {
		let pending = self.changes.list_changes(&self.store, table, Some(*applied))?;
		for record in &pending {
			match record.change_type {
				ChangeType::Row => {
					let rows = self.changes.get_row_set(&self.store, table, record.version)?;
					self.index.apply_row_changes(table, &rows)?;
				}
				ChangeType::Column => {
					let change = self.changes.get_schema_change(&self.store, table, record.version)?;
					let columns = self.schema.columns(&change.columns)?;
					self.index.update_schema(table, &columns)?;
					for column in columns.iter().filter(|c| c.column_type.is_list()) {
						self.index.create_list_column_index(table, column)?;
					}
				}
			}
			*applied = record.version;
		}
		Ok(pending.len())
	}
}
