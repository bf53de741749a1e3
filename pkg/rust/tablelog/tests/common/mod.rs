// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use tablelog::{
	ColumnId, ColumnType, LockConfig, MemoryLockService, ServiceConfig, TableId, TableService, TableServiceBuilder,
	UserId, WorkerConfig,
	core::{
		interface::TargetKind,
		model::{ColumnModel, IndexState, Row, RowSet},
	},
};
use tablelog_testing::{MemoryIndexEngine, MemorySchemaProvider, StaticTranslator, util::wait::wait_for};

pub const TABLE: TableId = TableId(1);
pub const VIEW: TableId = TableId(100);
pub const USER: UserId = UserId(42);
pub const NAME: ColumnId = ColumnId(1);
pub const AGE: ColumnId = ColumnId(2);

pub struct Fixture {
	pub service: TableService,
	pub schema: Arc<MemorySchemaProvider>,
	pub translator: Arc<StaticTranslator>,
	pub index: Arc<MemoryIndexEngine>,
	pub locks: Arc<MemoryLockService>,
}

pub fn name_column() -> ColumnModel {
	ColumnModel::new(NAME, "name", ColumnType::String)
}

pub fn age_column() -> ColumnModel {
	ColumnModel::new(AGE, "age", ColumnType::Integer)
}

pub fn config() -> ServiceConfig {
	ServiceConfig::default()
		.with_lock(LockConfig::default().table_timeout(Duration::from_secs(1)).index_timeout(Duration::from_millis(50)))
		.with_worker(WorkerConfig::default().threads(2).max_retries(10).retry_backoff(Duration::from_millis(10)))
}

pub fn fixture() -> Fixture {
	fixture_with(config(), |builder| builder)
}

pub fn fixture_with(config: ServiceConfig, customize: impl FnOnce(TableServiceBuilder) -> TableServiceBuilder) -> Fixture {
	let schema = Arc::new(MemorySchemaProvider::new());
	schema.add_table(TABLE, TargetKind::Table, vec![name_column()]);
	schema.add_column(age_column());
	let translator = Arc::new(StaticTranslator::new());
	let index = Arc::new(MemoryIndexEngine::new());
	let locks = Arc::new(MemoryLockService::new());

	let builder = TableServiceBuilder::new(schema.clone(), translator.clone(), index.clone())
		.with_config(config)
		.with_lock_service(locks.clone());
	let service = customize(builder).build().unwrap();

	Fixture {
		service,
		schema,
		translator,
		index,
		locks,
	}
}

pub fn rows(names: &[&str]) -> RowSet {
	RowSet {
		etag: None,
		headers: vec![NAME],
		rows: names
			.iter()
			.map(|name| Row {
				row_id: None,
				version: None,
				values: vec![Some(name.to_string())],
			})
			.collect(),
	}
}

pub fn state(f: &Fixture, target: TableId) -> Option<IndexState> {
	f.service.index_status(target).unwrap().map(|status| status.state)
}

/// Waits until the pool drained and `target` settled as available.
pub fn wait_available(f: &Fixture, target: TableId) {
	wait_for(
		|| f.service.is_idle() && state(f, target) == Some(IndexState::Available),
		&format!("{} never became available", target),
	);
}

/// Registers a materialized view over `sources` projecting the name column.
pub fn add_view(f: &Fixture, view: TableId, query: &str, sources: impl IntoIterator<Item = TableId>) {
	f.schema.add_table(view, TargetKind::MaterializedView, vec![]);
	f.translator.register(query, sources, vec![name_column()]);
}
