// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;
use tablelog_core::{
	interface::{SchemaProvider, TargetKind},
	model::ColumnModel,
};
use tablelog_type::{
	ColumnId, Result, TableId,
	diagnostic::validation::{column_not_found, table_not_found},
	error, internal_err, return_error,
};

#[derive(Default)]
pub struct MemorySchemaProvider {
	columns: RwLock<HashMap<ColumnId, ColumnModel>>,
	tables: RwLock<HashMap<TableId, (TargetKind, Vec<ColumnId>)>>,
	failing_binds: RwLock<HashSet<TableId>>,
}

impl MemorySchemaProvider {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_column(&self, column: ColumnModel) {
		self.columns.write().insert(column.id, column);
	}

	pub fn add_table(&self, table: TableId, kind: TargetKind, columns: Vec<ColumnModel>) {
		let ids = columns.iter().map(|c| c.id).collect();
		for column in columns {
			self.add_column(column);
		}
		self.tables.write().insert(table, (kind, ids));
	}

	pub fn remove_table(&self, table: TableId) {
		self.tables.write().remove(&table);
	}

	/// Makes every subsequent `bind_schema` of `table` fail.
	pub fn fail_bind(&self, table: TableId) {
		self.failing_binds.write().insert(table);
	}

	pub fn bound_columns(&self, table: TableId) -> Option<Vec<ColumnId>> {
		self.tables.read().get(&table).map(|(_, ids)| ids.clone())
	}
}

impl SchemaProvider for MemorySchemaProvider {
	fn table_kind(&self, table: TableId) -> Result<Option<TargetKind>> {
		Ok(self.tables.read().get(&table).map(|(kind, _)| *kind))
	}

	fn current_schema(&self, table: TableId) -> Result<Vec<ColumnModel>> {
		let ids = match self.tables.read().get(&table) {
			Some((_, ids)) => ids.clone(),
			None => return_error!(table_not_found(table)),
		};
		self.columns(&ids)
	}

	fn columns(&self, ids: &[ColumnId]) -> Result<Vec<ColumnModel>> {
		let columns = self.columns.read();
		ids.iter()
			.map(|id| columns.get(id).cloned().ok_or_else(|| error!(column_not_found(*id))))
			.collect()
	}

	fn bind_schema(&self, table: TableId, columns: &[ColumnId]) -> Result<()> {
		if self.failing_binds.read().contains(&table) {
			return internal_err!("binding schema of {} failed", table);
		}
		match self.tables.write().get_mut(&table) {
			Some((_, ids)) => {
				*ids = columns.to_vec();
				Ok(())
			}
			None => return_error!(table_not_found(table)),
		}
	}
}
