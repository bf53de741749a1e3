// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::{sync::Arc, time::Duration};

use tablelog_catalog::{StatusCatalog, ViewCatalog};
use tablelog_core::{
	interface::{IndexEngine, QueryPlan, SchemaProvider, SqlTranslator},
	model::{ColumnModel, IndexState, IndexStatus},
	util::now_millis,
};
use tablelog_lock::{LockGuard, LockKey, LockService};
use tablelog_store::MetadataStore;
use tablelog_type::{
	ColumnId, Error, Result, TableId,
	diagnostic::{
		lock::dependency_processing,
		view::{dependency_failed, self_dependency, view_not_found},
	},
	return_error,
};
use tracing::{debug, info, instrument, warn};

use crate::checksum;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
	/// The index was rebuilt with this many rows.
	Rebuilt(u64),
	/// Schema and sources were unchanged since the last build.
	Unchanged,
}

/// Rebuilds the physical index of a materialized view.
///
/// The view's own index lock is held exclusively for the whole build; each
/// dependency's index lock is held shared while the view reads from it.
pub struct ViewBuilder {
	store: MetadataStore,
	translator: Arc<dyn SqlTranslator>,
	schema: Arc<dyn SchemaProvider>,
	index: Arc<dyn IndexEngine>,
	locks: Arc<dyn LockService>,
	lock_timeout: Duration,
}

impl ViewBuilder {
	pub fn new(
		store: MetadataStore,
		translator: Arc<dyn SqlTranslator>,
		schema: Arc<dyn SchemaProvider>,
		index: Arc<dyn IndexEngine>,
		locks: Arc<dyn LockService>,
		lock_timeout: Duration,
	) -> Self {
		Self {
			store,
			translator,
			schema,
			index,
			locks,
			lock_timeout,
		}
	}

	/// Builds the view index if its schema or any dependency changed since
	/// the last build.
	///
	/// A dependency still being built yields a retryable error and leaves the
	/// view processing. Every other failure marks the view failed.
	#[instrument(name = "view::build", level = "debug", skip(self), fields(view = %view))]
	pub fn create_or_update_view_index(&self, view: TableId) -> Result<BuildOutcome> {
		let _lock = self.locks.exclusive(LockKey::Index(view), self.lock_timeout)?;

		match self.build(view) {
			Ok(outcome) => Ok(outcome),
			Err(err) if err.is_retryable() => {
				debug!(error = %err, "view build deferred");
				Err(err)
			}
			Err(err) => {
				self.mark_failed(view, &err);
				Err(err)
			}
		}
	}

	/// Drops the view index and its status.
	#[instrument(name = "view::delete_index", level = "debug", skip(self), fields(view = %view))]
	pub fn delete_view_index(&self, view: TableId) -> Result<()> {
		let _lock = self.locks.exclusive(LockKey::Index(view), self.lock_timeout)?;
		self.index.drop_index(view)?;

		let mut txn = self.store.begin_command();
		StatusCatalog::delete(&mut txn, view)?;
		txn.commit()?;
		info!("deleted view index");
		Ok(())
	}

	fn build(&self, view: TableId) -> Result<BuildOutcome> {
		let Some(definition) = ViewCatalog::get_definition(&self.store, view)? else {
			return_error!(view_not_found(view));
		};
		let plan = self.translator.compile(&definition.defining_query)?;
		if plan.sources.contains(&view) {
			return_error!(self_dependency(view));
		}

		let schema = if definition.is_live() {
			let ids: Vec<ColumnId> = plan.schema.iter().map(|c| c.id).collect();
			self.schema.bind_schema(view, &ids)?;
			plan.schema.clone()
		} else {
			self.schema.columns(&definition.schema)?
		};

		let _shared = self.lock_dependencies(&plan)?;
		let dependencies = self.check_dependencies(view, &plan)?;

		let schema_checksum = checksum::columns(&schema);
		let source_checksum = checksum::sources(&definition.defining_query, &dependencies);

		let current = StatusCatalog::get(&self.store, view)?;
		if let Some(status) = &current {
			let unchanged = status.schema_checksum == Some(schema_checksum)
				&& status.source_checksum == Some(source_checksum)
				&& self.index.exists(view)?;
			if unchanged {
				if !status.is_available() {
					self.store_available(view, schema_checksum, source_checksum)?;
				}
				debug!("view index up to date");
				return Ok(BuildOutcome::Unchanged);
			}
		}

		let rows = self.rebuild(view, &plan, &schema)?;
		self.store_available(view, schema_checksum, source_checksum)?;
		info!(rows, "rebuilt view index");
		Ok(BuildOutcome::Rebuilt(rows))
	}

	/// Every dependency must have an available index; returns their statuses
	/// in id order.
	fn check_dependencies(&self, view: TableId, plan: &QueryPlan) -> Result<Vec<(TableId, IndexStatus)>> {
		let mut statuses = Vec::with_capacity(plan.sources.len());
		for dependency in &plan.sources {
			let status = match StatusCatalog::get(&self.store, *dependency)? {
				Some(status) => status,
				None => return_error!(dependency_processing(view, *dependency)),
			};
			match status.state {
				IndexState::Available => statuses.push((*dependency, status)),
				IndexState::Failed => {
					return_error!(dependency_failed(view, *dependency, status.diagnostic.as_deref()))
				}
				IndexState::Pending | IndexState::Processing => {
					return_error!(dependency_processing(view, *dependency))
				}
			}
		}
		Ok(statuses)
	}

	fn lock_dependencies(&self, plan: &QueryPlan) -> Result<Vec<LockGuard>> {
		plan.sources
			.iter()
			.map(|dependency| self.locks.shared(LockKey::Index(*dependency), self.lock_timeout))
			.collect()
	}

	fn rebuild(&self, view: TableId, plan: &QueryPlan, schema: &[ColumnModel]) -> Result<u64> {
		self.index.drop_index(view)?;
		self.index.create_index(view, schema)?;

		let plan = QueryPlan {
			query: plan.query.clone(),
			sources: plan.sources.clone(),
			schema: schema.to_vec(),
		};
		let rows = self.index.populate(view, &plan)?;

		for column in schema.iter().filter(|c| c.column_type.is_list()) {
			self.index.create_list_column_index(view, column)?;
		}
		Ok(rows)
	}

	fn store_available(&self, view: TableId, schema_checksum: u64, source_checksum: u64) -> Result<()> {
		let mut txn = self.store.begin_command();
		let now = now_millis();
		let mut status = StatusCatalog::get_for_update(&mut txn, view)?.unwrap_or_else(|| IndexStatus::pending(view, now));
		status.state = IndexState::Available;
		status.schema_checksum = Some(schema_checksum);
		status.source_checksum = Some(source_checksum);
		status.diagnostic = None;
		status.changed_on = now;
		StatusCatalog::set(&mut txn, &status)?;
		txn.commit()
	}

	fn mark_failed(&self, view: TableId, err: &Error) {
		let result = (|| {
			let mut txn = self.store.begin_command();
			StatusCatalog::mark(&mut txn, view, IndexState::Failed, Some(err.to_string()))?;
			txn.commit()
		})();
		match result {
			Ok(()) => warn!(view = %view, error = %err, "view build failed"),
			Err(mark) => warn!(view = %view, error = %err, mark_error = %mark, "view build failed and status not recorded"),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::{sync::Arc, time::Duration};

	use tablelog_catalog::{StatusCatalog, ViewCatalog};
	use tablelog_core::{
		interface::{IndexEngine, TargetKind},
		model::{ColumnModel, IndexState, IndexStatus, SparseChangeSet, SparseRow, ViewDefinition},
	};
	use tablelog_lock::{LockKey, LockService, MemoryLockService};
	use tablelog_store::MetadataStore;
	use tablelog_testing::{MemoryIndexEngine, MemorySchemaProvider, StaticTranslator};
	use tablelog_type::{ColumnId, ColumnType, ErrorKind, RowId, TableId, Version};

	use super::{BuildOutcome, ViewBuilder};

	const SOURCE: TableId = TableId(1);
	const VIEW: TableId = TableId(10);
	const QUERY: &str = "select name, tags from t1";

	struct Harness {
		builder: ViewBuilder,
		store: MetadataStore,
		index: Arc<MemoryIndexEngine>,
		locks: MemoryLockService,
	}

	fn view_schema() -> Vec<ColumnModel> {
		vec![ColumnModel::new(1u64, "name", ColumnType::String), ColumnModel::new(3u64, "tags", ColumnType::StringList)]
	}

	fn harness() -> Harness {
		let store = MetadataStore::memory();
		let translator = Arc::new(StaticTranslator::new());
		translator.register(QUERY, [SOURCE], view_schema());
		let schema = Arc::new(MemorySchemaProvider::new());
		schema.add_table(VIEW, TargetKind::MaterializedView, vec![]);

		let index = Arc::new(MemoryIndexEngine::new());
		index.create_index(SOURCE, &view_schema()).unwrap();
		index.apply_row_changes(
			SOURCE,
			&SparseChangeSet::new(
				None,
				vec![
					SparseRow::with_id(RowId(0), None).set(ColumnId(1), "a").set(ColumnId(3), "[\"x\"]"),
					SparseRow::with_id(RowId(1), None).set(ColumnId(1), "b"),
				],
			),
		)
		.unwrap();

		let locks = MemoryLockService::new();
		let builder = ViewBuilder::new(
			store.clone(),
			translator.clone(),
			schema,
			index.clone(),
			Arc::new(locks.clone()),
			Duration::from_millis(50),
		);

		let mut txn = store.begin_command();
		ViewCatalog::set_definition(
			&mut txn,
			&ViewDefinition {
				view: VIEW,
				defining_query: QUERY.to_string(),
				sources: [SOURCE].into(),
				schema: vec![ColumnId(1), ColumnId(3)],
				pinned: None,
			},
		)
		.unwrap();
		txn.commit().unwrap();

		Harness {
			builder,
			store,
			index,
			locks,
		}
	}

	fn set_source_state(h: &Harness, state: IndexState, source_checksum: u64) {
		let mut status = IndexStatus::pending(SOURCE, 0);
		status.state = state;
		status.source_checksum = Some(source_checksum);
		status.applied_version = Version(0);
		let mut txn = h.store.begin_command();
		StatusCatalog::set(&mut txn, &status).unwrap();
		txn.commit().unwrap();
	}

	fn view_state(h: &Harness) -> IndexState {
		StatusCatalog::get(&h.store, VIEW).unwrap().unwrap().state
	}

	#[test]
	fn test_builds_then_skips_unchanged() {
		let h = harness();
		set_source_state(&h, IndexState::Available, 1);

		assert_eq!(h.builder.create_or_update_view_index(VIEW).unwrap(), BuildOutcome::Rebuilt(2));
		assert_eq!(view_state(&h), IndexState::Available);
		assert_eq!(h.index.row_count(VIEW), Some(2));
		assert_eq!(h.index.list_indexes(VIEW), vec![ColumnId(3)]);

		let mutations = h.index.mutations();
		assert_eq!(h.builder.create_or_update_view_index(VIEW).unwrap(), BuildOutcome::Unchanged);
		assert_eq!(h.index.mutations(), mutations);
	}

	#[test]
	fn test_source_change_triggers_rebuild() {
		let h = harness();
		set_source_state(&h, IndexState::Available, 1);
		h.builder.create_or_update_view_index(VIEW).unwrap();

		set_source_state(&h, IndexState::Available, 2);
		assert_eq!(h.builder.create_or_update_view_index(VIEW).unwrap(), BuildOutcome::Rebuilt(2));
	}

	#[test]
	fn test_processing_dependency_is_retryable_and_keeps_status() {
		let h = harness();
		let mut txn = h.store.begin_command();
		StatusCatalog::mark(&mut txn, VIEW, IndexState::Processing, None).unwrap();
		txn.commit().unwrap();

		let err = h.builder.create_or_update_view_index(VIEW).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::LockUnavailable);
		assert!(err.is_retryable());

		set_source_state(&h, IndexState::Processing, 1);
		assert!(h.builder.create_or_update_view_index(VIEW).unwrap_err().is_retryable());
		assert_eq!(view_state(&h), IndexState::Processing);
		assert_eq!(h.index.row_count(VIEW), None);
	}

	#[test]
	fn test_failed_dependency_fails_view() {
		let h = harness();
		set_source_state(&h, IndexState::Failed, 1);

		let err = h.builder.create_or_update_view_index(VIEW).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::DependencyFailed);
		let status = StatusCatalog::get(&h.store, VIEW).unwrap().unwrap();
		assert_eq!(status.state, IndexState::Failed);
		assert!(status.diagnostic.unwrap().contains("VIEW_001"));
	}

	#[test]
	fn test_populate_failure_marks_failed_then_recovers() {
		let h = harness();
		set_source_state(&h, IndexState::Available, 1);
		h.index.fail_populate(VIEW);

		let err = h.builder.create_or_update_view_index(VIEW).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Internal);
		assert_eq!(view_state(&h), IndexState::Failed);

		h.index.heal(VIEW);
		assert_eq!(h.builder.create_or_update_view_index(VIEW).unwrap(), BuildOutcome::Rebuilt(2));
		assert_eq!(view_state(&h), IndexState::Available);
	}

	#[test]
	fn test_busy_view_lock_is_retryable() {
		let h = harness();
		set_source_state(&h, IndexState::Available, 1);
		let _held = h.locks.exclusive(LockKey::Index(VIEW), Duration::from_millis(10)).unwrap();

		let err = h.builder.create_or_update_view_index(VIEW).unwrap_err();
		assert!(err.is_retryable());
		assert!(StatusCatalog::get(&h.store, VIEW).unwrap().is_none());
	}

	#[test]
	fn test_unregistered_view_fails() {
		let h = harness();
		let err = h.builder.create_or_update_view_index(TableId(99)).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::NotFound);
	}

	#[test]
	fn test_delete_view_index() {
		let h = harness();
		set_source_state(&h, IndexState::Available, 1);
		h.builder.create_or_update_view_index(VIEW).unwrap();

		h.builder.delete_view_index(VIEW).unwrap();
		assert_eq!(h.index.row_count(VIEW), None);
		assert!(StatusCatalog::get(&h.store, VIEW).unwrap().is_none());
		assert!(!h.locks.is_locked(LockKey::Index(VIEW)));
	}
}
