// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::{sync::Arc, time::Duration};

use tablelog_catalog::ChangeLogStore;
use tablelog_core::{
	interceptor::{InterceptorChain, TablePostCommitContext, TablePostCommitInterceptor},
	interface::{AccessControl, IndexEngine, SchemaProvider, SnapshotChange},
	model::{TableChange, TableChangeResult},
};
use tablelog_lock::{LockKey, LockService};
use tablelog_store::MetadataStore;
use tablelog_type::{
	Result, TableId, UserId,
	diagnostic::{
		auth::write_access_denied,
		validation::{empty_transaction, table_not_found},
	},
	return_error,
};
use tracing::{debug, instrument, warn};

use crate::{
	EphemeralSnapshot,
	target::{AppendableTarget, BatchState, TargetContext, TargetRegistry, rows_of},
};

/// Runs a batch of changes against one table as a single transaction.
///
/// The batch is validated in full before anything is written, under the
/// table's exclusive lock. A failure while applying rolls back every change
/// of the batch, including payload blobs already written.
pub struct TransactionCoordinator {
	store: MetadataStore,
	changes: ChangeLogStore,
	schema: Arc<dyn SchemaProvider>,
	access: Arc<dyn AccessControl>,
	index: Arc<dyn IndexEngine>,
	locks: Arc<dyn LockService>,
	table_lock_timeout: Duration,
	registry: TargetRegistry,
	post_commit: InterceptorChain<dyn TablePostCommitInterceptor>,
}

impl TransactionCoordinator {
	pub fn new(
		store: MetadataStore,
		changes: ChangeLogStore,
		schema: Arc<dyn SchemaProvider>,
		access: Arc<dyn AccessControl>,
		index: Arc<dyn IndexEngine>,
		locks: Arc<dyn LockService>,
		table_lock_timeout: Duration,
	) -> Self {
		Self {
			store,
			changes,
			schema,
			access,
			index,
			locks,
			table_lock_timeout,
			registry: TargetRegistry::default(),
			post_commit: InterceptorChain::new(),
		}
	}

	pub fn with_registry(mut self, registry: TargetRegistry) -> Self {
		self.registry = registry;
		self
	}

	/// Registers an interceptor run after every successful commit.
	pub fn add_post_commit(&mut self, interceptor: Arc<dyn TablePostCommitInterceptor>) {
		self.post_commit.add(interceptor);
	}

	pub fn store(&self) -> &MetadataStore {
		&self.store
	}

	pub fn changes(&self) -> &ChangeLogStore {
		&self.changes
	}

	#[instrument(
		name = "transaction::update_table",
		level = "debug",
		skip(self, changes),
		fields(table = %table, user = %user, changes = changes.len())
	)]
	pub fn update_table_with_transaction(
		&self,
		user: UserId,
		table: TableId,
		changes: Vec<TableChange>,
	) -> Result<Vec<TableChangeResult>> {
		if changes.is_empty() {
			return_error!(empty_transaction(table));
		}
		if !self.access.can_write(user, table)? {
			return_error!(write_access_denied(user, table));
		}
		let Some(kind) = self.schema.table_kind(table)? else {
			return_error!(table_not_found(table));
		};
		let target = self.registry.resolve(table, kind)?;

		let _lock = self.locks.exclusive(LockKey::Table(table), self.table_lock_timeout)?;

		let schema = self.schema.current_schema(table)?;
		let ctx = TargetContext {
			changes: &self.changes,
			schema: self.schema.as_ref(),
		};

		self.validate(&ctx, target.as_ref(), BatchState::new(table, user, schema.clone()), &changes)?;

		let mut state = BatchState::new(table, user, schema);
		let mut txn = self.store.begin_command();
		let mut results = Vec::with_capacity(changes.len());
		for change in &changes {
			match target.apply(&ctx, &mut txn, &mut state, change) {
				Ok(result) => results.push(result),
				Err(err) => {
					warn!(change = change.name(), error = %err, "rolling back table transaction");
					if let Err(rollback) = txn.rollback() {
						warn!(error = %rollback, "rollback failed");
					}
					return Err(err);
				}
			}
		}
		txn.commit()?;

		if state.schema_changed {
			if let Err(err) = self.schema.bind_schema(table, &state.column_ids()) {
				warn!(error = %err, "failed to bind committed schema");
			}
		}

		let versions = results.iter().filter_map(TableChangeResult::version).collect();
		let post_commit = TablePostCommitContext::new(table, user, versions);
		if let Err(err) = self.post_commit.execute(&post_commit) {
			warn!(error = %err, "post-commit interceptor failed");
		}

		debug!(last_version = ?post_commit.last_version(), "table transaction committed");
		Ok(results)
	}

	/// Validates every change in order without writing. When the batch
	/// contains a schema change and the table has an index, the changes are
	/// also replayed against a private snapshot of that index.
	fn validate(
		&self,
		ctx: &TargetContext<'_>,
		target: &dyn AppendableTarget,
		mut state: BatchState,
		changes: &[TableChange],
	) -> Result<()> {
		let snapshot = if changes.iter().any(TableChange::requires_full_validation) && self.index.exists(state.table)? {
			Some(EphemeralSnapshot::create(self.index.as_ref(), state.table)?)
		} else {
			None
		};

		for change in changes {
			target.validate(ctx, &mut state, change)?;

			let Some(snapshot) = &snapshot else {
				continue;
			};
			match change {
				TableChange::SchemaChange(_) => snapshot.validate(SnapshotChange::Schema(&state.schema))?,
				_ => {
					if let Some(rows) = rows_of(change)? {
						snapshot.validate(SnapshotChange::Rows(&rows))?;
					}
				}
			}
		}
		Ok(())
	}
}
