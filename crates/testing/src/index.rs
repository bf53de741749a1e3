// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::{
	collections::{BTreeMap, BTreeSet, HashMap, HashSet},
	sync::atomic::{AtomicU64, Ordering},
};

use parking_lot::{Mutex, RwLock};
use tablelog_core::{
	interface::{IndexEngine, QueryPlan, SnapshotChange, SnapshotId},
	model::{ColumnModel, SparseChangeSet},
};
use tablelog_type::{
	ColumnId, Result, RowId, TableId,
	diagnostic::{
		validation::{incompatible_column_change, invalid_value, unknown_column},
		view::{index_not_found, snapshot_not_found},
	},
	internal_err, return_error,
};

type Cells = BTreeMap<ColumnId, Option<String>>;

type Hook = Box<dyn FnOnce() + Send>;

#[derive(Debug, Clone)]
struct MemoryIndex {
	target: TableId,
	schema: Vec<ColumnModel>,
	rows: BTreeMap<RowId, Cells>,
	list_indexes: BTreeSet<ColumnId>,
}

impl MemoryIndex {
	fn new(target: TableId, schema: &[ColumnModel]) -> Self {
		Self {
			target,
			schema: schema.to_vec(),
			rows: BTreeMap::new(),
			list_indexes: BTreeSet::new(),
		}
	}

	fn apply(&mut self, changes: &SparseChangeSet) {
		for row in &changes.rows {
			let Some(row_id) = row.row_id else {
				continue;
			};
			if row.is_delete() {
				self.rows.remove(&row_id);
				continue;
			}
			let cells = self.rows.entry(row_id).or_default();
			for (column, value) in &row.values {
				cells.insert(*column, value.clone());
			}
		}
	}

	fn validate_rows(&self, changes: &SparseChangeSet) -> Result<()> {
		for row in &changes.rows {
			for (column, value) in &row.values {
				let Some(model) = self.schema.iter().find(|c| c.id == *column) else {
					return_error!(unknown_column(self.target, *column));
				};
				if let Some(value) = value {
					if !model.column_type.accepts(value) {
						return_error!(invalid_value(*column, model.column_type, value));
					}
				}
			}
		}
		Ok(())
	}

	fn rebind(&mut self, schema: &[ColumnModel]) -> Result<()> {
		for cells in self.rows.values() {
			for model in schema {
				if let Some(Some(value)) = cells.get(&model.id) {
					if !model.column_type.accepts(value) {
						return_error!(incompatible_column_change(model.id, model.column_type, value));
					}
				}
			}
		}
		let keep: HashSet<ColumnId> = schema.iter().map(|c| c.id).collect();
		for cells in self.rows.values_mut() {
			cells.retain(|column, _| keep.contains(column));
		}
		self.list_indexes.retain(|column| keep.contains(column));
		self.schema = schema.to_vec();
		Ok(())
	}
}

/// Physical indexes held in memory. `populate` unions the projected rows of
/// the plan's sources. Every mutation bumps a counter tests can observe.
#[derive(Default)]
pub struct MemoryIndexEngine {
	indexes: RwLock<HashMap<TableId, MemoryIndex>>,
	snapshots: RwLock<HashMap<SnapshotId, MemoryIndex>>,
	next_snapshot: AtomicU64,
	mutations: AtomicU64,
	failing: RwLock<HashSet<TableId>>,
	before_apply: Mutex<Option<Hook>>,
}

impl MemoryIndexEngine {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of index mutations performed so far.
	pub fn mutations(&self) -> u64 {
		self.mutations.load(Ordering::SeqCst)
	}

	pub fn row_count(&self, target: TableId) -> Option<usize> {
		self.indexes.read().get(&target).map(|index| index.rows.len())
	}

	pub fn row(&self, target: TableId, row: RowId) -> Option<BTreeMap<ColumnId, Option<String>>> {
		self.indexes.read().get(&target).and_then(|index| index.rows.get(&row).cloned())
	}

	pub fn schema(&self, target: TableId) -> Option<Vec<ColumnModel>> {
		self.indexes.read().get(&target).map(|index| index.schema.clone())
	}

	pub fn list_indexes(&self, target: TableId) -> Vec<ColumnId> {
		self.indexes.read().get(&target).map(|index| index.list_indexes.iter().copied().collect()).unwrap_or_default()
	}

	pub fn snapshot_count(&self) -> usize {
		self.snapshots.read().len()
	}

	/// Makes every subsequent `populate` of `target` fail.
	pub fn fail_populate(&self, target: TableId) {
		self.failing.write().insert(target);
	}

	pub fn heal(&self, target: TableId) {
		self.failing.write().remove(&target);
	}

	/// Runs `hook` once, at the start of the next `apply_row_changes`.
	pub fn before_next_apply(&self, hook: impl FnOnce() + Send + 'static) {
		*self.before_apply.lock() = Some(Box::new(hook));
	}

	fn mutated(&self) {
		self.mutations.fetch_add(1, Ordering::SeqCst);
	}
}

impl IndexEngine for MemoryIndexEngine {
	fn exists(&self, target: TableId) -> Result<bool> {
		Ok(self.indexes.read().contains_key(&target))
	}

	fn create_index(&self, target: TableId, schema: &[ColumnModel]) -> Result<()> {
		self.indexes.write().insert(target, MemoryIndex::new(target, schema));
		self.mutated();
		Ok(())
	}

	fn drop_index(&self, target: TableId) -> Result<()> {
		if self.indexes.write().remove(&target).is_some() {
			self.mutated();
		}
		Ok(())
	}

	fn apply_row_changes(&self, target: TableId, changes: &SparseChangeSet) -> Result<()> {
		let hook = self.before_apply.lock().take();
		if let Some(hook) = hook {
			hook();
		}

		let mut indexes = self.indexes.write();
		let Some(index) = indexes.get_mut(&target) else {
			return_error!(index_not_found(target));
		};
		index.apply(changes);
		self.mutated();
		Ok(())
	}

	fn update_schema(&self, target: TableId, schema: &[ColumnModel]) -> Result<()> {
		let mut indexes = self.indexes.write();
		let Some(index) = indexes.get_mut(&target) else {
			return_error!(index_not_found(target));
		};
		index.rebind(schema)?;
		self.mutated();
		Ok(())
	}

	fn populate(&self, target: TableId, plan: &QueryPlan) -> Result<u64> {
		if self.failing.read().contains(&target) {
			return internal_err!("populate of {} failed", target);
		}
		let mut indexes = self.indexes.write();
		let mut rows = Vec::new();
		for source in &plan.sources {
			let Some(index) = indexes.get(source) else {
				return_error!(index_not_found(*source));
			};
			for cells in index.rows.values() {
				let projected: Cells = plan
					.schema
					.iter()
					.map(|column| (column.id, cells.get(&column.id).cloned().flatten()))
					.collect();
				rows.push(projected);
			}
		}
		let Some(index) = indexes.get_mut(&target) else {
			return_error!(index_not_found(target));
		};
		let count = rows.len() as u64;
		for (i, cells) in rows.into_iter().enumerate() {
			index.rows.insert(RowId(i as i64), cells);
		}
		self.mutated();
		Ok(count)
	}

	fn create_list_column_index(&self, target: TableId, column: &ColumnModel) -> Result<()> {
		let mut indexes = self.indexes.write();
		let Some(index) = indexes.get_mut(&target) else {
			return_error!(index_not_found(target));
		};
		index.list_indexes.insert(column.id);
		self.mutated();
		Ok(())
	}

	fn create_snapshot(&self, source: TableId) -> Result<SnapshotId> {
		let copy = match self.indexes.read().get(&source) {
			Some(index) => index.clone(),
			None => return_error!(index_not_found(source)),
		};
		let id = SnapshotId(self.next_snapshot.fetch_add(1, Ordering::SeqCst));
		self.snapshots.write().insert(id, copy);
		Ok(id)
	}

	fn validate_change(&self, snapshot: SnapshotId, change: SnapshotChange<'_>) -> Result<()> {
		let mut snapshots = self.snapshots.write();
		let Some(index) = snapshots.get_mut(&snapshot) else {
			return_error!(snapshot_not_found(snapshot.0));
		};
		match change {
			SnapshotChange::Rows(changes) => {
				index.validate_rows(changes)?;
				index.apply(changes);
				Ok(())
			}
			SnapshotChange::Schema(schema) => index.rebind(schema),
		}
	}

	fn drop_snapshot(&self, snapshot: SnapshotId) -> Result<()> {
		self.snapshots.write().remove(&snapshot);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeSet;

	use tablelog_core::{
		interface::{IndexEngine, QueryPlan, SnapshotChange},
		model::{ColumnModel, SparseChangeSet, SparseRow},
	};
	use tablelog_type::{ColumnId, ColumnType, ErrorKind, RowId, TableId};

	use super::MemoryIndexEngine;

	fn schema() -> Vec<ColumnModel> {
		vec![ColumnModel::new(1u64, "name", ColumnType::String), ColumnModel::new(2u64, "age", ColumnType::Integer)]
	}

	fn rows() -> SparseChangeSet {
		SparseChangeSet::new(
			None,
			vec![
				SparseRow::with_id(RowId(0), None).set(ColumnId(1), "a").set(ColumnId(2), "1"),
				SparseRow::with_id(RowId(1), None).set(ColumnId(1), "b").set(ColumnId(2), "2"),
			],
		)
	}

	#[test]
	fn test_apply_and_delete() {
		let engine = MemoryIndexEngine::new();
		engine.create_index(TableId(1), &schema()).unwrap();
		engine.apply_row_changes(TableId(1), &rows()).unwrap();
		assert_eq!(engine.row_count(TableId(1)), Some(2));

		let delete = SparseChangeSet::new(None, vec![SparseRow::with_id(RowId(0), None)]);
		engine.apply_row_changes(TableId(1), &delete).unwrap();
		assert_eq!(engine.row_count(TableId(1)), Some(1));
	}

	#[test]
	fn test_snapshot_validation_is_private() {
		let engine = MemoryIndexEngine::new();
		engine.create_index(TableId(1), &schema()).unwrap();
		engine.apply_row_changes(TableId(1), &rows()).unwrap();

		let snapshot = engine.create_snapshot(TableId(1)).unwrap();
		let bad = SparseChangeSet::new(None, vec![SparseRow::new().set(ColumnId(2), "x")]);
		let err = engine.validate_change(snapshot, SnapshotChange::Rows(&bad)).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Validation);

		let narrowed = vec![ColumnModel::new(1u64, "name", ColumnType::Integer)];
		let err = engine.validate_change(snapshot, SnapshotChange::Schema(&narrowed)).unwrap_err();
		assert_eq!(err.code(), "VAL_009");

		engine.drop_snapshot(snapshot).unwrap();
		assert_eq!(engine.snapshot_count(), 0);
		assert_eq!(engine.schema(TableId(1)).unwrap(), schema());
	}

	#[test]
	fn test_populate_projects_sources() {
		let engine = MemoryIndexEngine::new();
		engine.create_index(TableId(1), &schema()).unwrap();
		engine.apply_row_changes(TableId(1), &rows()).unwrap();

		let view_schema = vec![ColumnModel::new(1u64, "name", ColumnType::String)];
		engine.create_index(TableId(9), &view_schema).unwrap();
		let plan = QueryPlan {
			query: "select name from t1".to_string(),
			sources: BTreeSet::from([TableId(1)]),
			schema: view_schema,
		};
		assert_eq!(engine.populate(TableId(9), &plan).unwrap(), 2);
		let row = engine.row(TableId(9), RowId(0)).unwrap();
		assert_eq!(row.len(), 1);
		assert_eq!(row.get(&ColumnId(1)), Some(&Some("a".to_string())));
	}
}
