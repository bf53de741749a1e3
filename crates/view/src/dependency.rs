// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::{collections::BTreeSet, sync::Arc};

use tablelog_catalog::{StatusCatalog, ViewCatalog};
use tablelog_core::{
	interceptor::{TablePostCommitContext, TablePostCommitInterceptor},
	interface::{RebuildJob, RebuildTrigger, SchemaProvider, SqlTranslator},
	model::{IndexState, ViewDefinition},
};
use tablelog_store::MetadataStore;
use tablelog_type::{ColumnId, Result, TableId, diagnostic::view::self_dependency, return_error};
use tracing::{debug, info, instrument};

use crate::ViewConfig;

/// Tracks which tables each view reads and schedules rebuilds when those
/// tables change.
///
/// Edges are stored twice: `(view, source)` to diff a view's sources when its
/// query changes, and `(source, view)` to page through a table's dependents.
pub struct ViewDependencyManager {
	store: MetadataStore,
	translator: Arc<dyn SqlTranslator>,
	schema: Arc<dyn SchemaProvider>,
	trigger: Arc<dyn RebuildTrigger>,
	config: ViewConfig,
}

impl ViewDependencyManager {
	pub fn new(
		store: MetadataStore,
		translator: Arc<dyn SqlTranslator>,
		schema: Arc<dyn SchemaProvider>,
		trigger: Arc<dyn RebuildTrigger>,
		config: ViewConfig,
	) -> Self {
		Self {
			store,
			translator,
			schema,
			trigger,
			config,
		}
	}

	/// Parses the view's defining query, updates its source edges by the
	/// difference to what is recorded, binds the derived schema and schedules
	/// a rebuild of the view index.
	#[instrument(name = "view::register", level = "debug", skip(self, defining_query), fields(view = %view))]
	pub fn register_source_tables(&self, view: TableId, defining_query: &str) -> Result<ViewDefinition> {
		let parsed = self.translator.parse(defining_query)?;
		if parsed.referenced_tables.contains(&view) {
			return_error!(self_dependency(view));
		}
		let schema: Vec<ColumnId> = parsed.result_schema.iter().map(|c| c.id).collect();

		let mut txn = self.store.begin_command();
		let previous = ViewCatalog::get_definition(&txn, view)?;
		let recorded = ViewCatalog::sources(&txn, view)?;

		let added: Vec<TableId> = parsed.referenced_tables.difference(&recorded).copied().collect();
		let removed: Vec<TableId> = recorded.difference(&parsed.referenced_tables).copied().collect();
		for source in &added {
			ViewCatalog::add_edge(&mut txn, view, *source)?;
		}
		for source in &removed {
			ViewCatalog::remove_edge(&mut txn, view, *source)?;
		}

		let definition = ViewDefinition {
			view,
			defining_query: defining_query.to_string(),
			sources: parsed.referenced_tables,
			schema,
			pinned: previous.and_then(|d| d.pinned),
		};
		ViewCatalog::set_definition(&mut txn, &definition)?;
		StatusCatalog::mark(&mut txn, view, IndexState::Processing, None)?;
		txn.commit()?;

		self.schema.bind_schema(view, &definition.schema)?;
		self.trigger.trigger(RebuildJob::ViewIndex(view))?;

		info!(added = added.len(), removed = removed.len(), "registered view sources");
		Ok(definition)
	}

	pub fn register_defining_query(&self, view: TableId, defining_query: &str) -> Result<ViewDefinition> {
		self.register_source_tables(view, defining_query)
	}

	pub fn definition(&self, view: TableId) -> Result<Option<ViewDefinition>> {
		ViewCatalog::get_definition(&self.store, view)
	}

	pub fn sources(&self, view: TableId) -> Result<BTreeSet<TableId>> {
		ViewCatalog::sources(&self.store, view)
	}

	/// Marks every view reading `table` as processing and schedules its
	/// rebuild. Views of views are not followed. Returns the number of views
	/// refreshed.
	#[instrument(name = "view::refresh_dependents", level = "debug", skip(self), fields(table = %table))]
	pub fn refresh_dependent_materialized_views(&self, table: TableId) -> Result<usize> {
		let page_size = self.config.dependents_page_size.max(1);
		let mut after = None;
		let mut refreshed = 0;
		loop {
			let page = ViewCatalog::dependents_page(&self.store, table, after, page_size)?;
			if page.is_empty() {
				break;
			}

			let mut txn = self.store.begin_command();
			for view in &page {
				StatusCatalog::mark(&mut txn, *view, IndexState::Processing, None)?;
			}
			txn.commit()?;

			for view in &page {
				self.trigger.trigger(RebuildJob::ViewIndex(*view))?;
			}
			refreshed += page.len();

			if page.len() < page_size {
				break;
			}
			after = page.last().copied();
		}
		debug!(refreshed, "refreshed dependent views");
		Ok(refreshed)
	}

	/// Schedules the table's own index update, then its dependent views.
	#[instrument(name = "view::on_table_changed", level = "debug", skip(self), fields(table = %table))]
	pub fn on_table_changed(&self, table: TableId) -> Result<()> {
		let mut txn = self.store.begin_command();
		StatusCatalog::mark(&mut txn, table, IndexState::Processing, None)?;
		txn.commit()?;

		self.trigger.trigger(RebuildJob::TableIndex(table))?;
		self.refresh_dependent_materialized_views(table)?;
		Ok(())
	}

	/// Removes the view's edges, definition and index status.
	#[instrument(name = "view::unregister", level = "debug", skip(self), fields(view = %view))]
	pub fn unregister(&self, view: TableId) -> Result<()> {
		let mut txn = self.store.begin_command();
		for source in ViewCatalog::sources(&txn, view)? {
			ViewCatalog::remove_edge(&mut txn, view, source)?;
		}
		ViewCatalog::delete_definition(&mut txn, view)?;
		StatusCatalog::delete(&mut txn, view)?;
		txn.commit()?;
		info!("unregistered view");
		Ok(())
	}
}

impl TablePostCommitInterceptor for ViewDependencyManager {
	fn intercept(&self, ctx: &TablePostCommitContext) -> Result<()> {
		self.on_table_changed(ctx.table)
	}
}
