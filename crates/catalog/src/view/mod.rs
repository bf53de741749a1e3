// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::collections::BTreeSet;

use tablelog_core::{
	encoded::{decode_value, encode_value},
	key::{EncodableKey, SourceViewKey, ViewDefinitionKey, ViewSourceKey},
	model::ViewDefinition,
};
use tablelog_store::{CommandTransaction, MetadataRead};
use tablelog_type::{Result, TableId, internal_err};

/// View definitions and the dependency edges between views and their
/// source tables. Each edge is stored twice: (view, source) to list a view's
/// sources, and (source, view) to list a table's dependents.
pub struct ViewCatalog;

impl ViewCatalog {
	pub fn get_definition(rx: &impl MetadataRead, view: TableId) -> Result<Option<ViewDefinition>> {
		match rx.get(&ViewDefinitionKey::encoded(view))? {
			Some(bytes) => Ok(Some(decode_value(&bytes)?)),
			None => Ok(None),
		}
	}

	pub fn set_definition(txn: &mut CommandTransaction, definition: &ViewDefinition) -> Result<()> {
		txn.set(&ViewDefinitionKey::encoded(definition.view), encode_value(definition)?)
	}

	pub fn delete_definition(txn: &mut CommandTransaction, view: TableId) -> Result<()> {
		txn.remove(&ViewDefinitionKey::encoded(view))
	}

	/// The recorded source tables of a view.
	pub fn sources(rx: &impl MetadataRead, view: TableId) -> Result<BTreeSet<TableId>> {
		let mut sources = BTreeSet::new();
		for (key, _) in rx.range(&ViewSourceKey::full_scan(view))? {
			match ViewSourceKey::decode(&key) {
				Some(edge) => {
					sources.insert(edge.source);
				}
				None => return internal_err!("malformed view source key {:?}", key),
			}
		}
		Ok(sources)
	}

	pub fn add_edge(txn: &mut CommandTransaction, view: TableId, source: TableId) -> Result<()> {
		txn.set(&ViewSourceKey::encoded(view, source), Vec::new())?;
		txn.set(&SourceViewKey::encoded(source, view), Vec::new())
	}

	pub fn remove_edge(txn: &mut CommandTransaction, view: TableId, source: TableId) -> Result<()> {
		txn.remove(&ViewSourceKey::encoded(view, source))?;
		txn.remove(&SourceViewKey::encoded(source, view))
	}

	/// Up to `limit` views depending on `source`, ordered by id and starting
	/// after `after`.
	pub fn dependents_page(
		rx: &impl MetadataRead,
		source: TableId,
		after: Option<TableId>,
		limit: usize,
	) -> Result<Vec<TableId>> {
		let range = match after {
			Some(view) => SourceViewKey::after(source, view),
			None => SourceViewKey::full_scan(source),
		};
		let mut views = Vec::new();
		for (key, _) in rx.range(&range)?.into_iter().take(limit) {
			match SourceViewKey::decode(&key) {
				Some(edge) => views.push(edge.view),
				None => return internal_err!("malformed source view key {:?}", key),
			}
		}
		Ok(views)
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeSet;

	use tablelog_core::model::ViewDefinition;
	use tablelog_store::MetadataStore;
	use tablelog_type::{ColumnId, TableId};

	use super::ViewCatalog;

	#[test]
	fn test_definition_roundtrip() {
		let store = MetadataStore::memory();
		let definition = ViewDefinition {
			view: TableId(10),
			defining_query: "select * from t1".to_string(),
			sources: BTreeSet::from([TableId(1)]),
			schema: vec![ColumnId(1)],
			pinned: None,
		};
		let mut txn = store.begin_command();
		ViewCatalog::set_definition(&mut txn, &definition).unwrap();
		txn.commit().unwrap();
		assert_eq!(ViewCatalog::get_definition(&store, TableId(10)).unwrap(), Some(definition));

		let mut txn = store.begin_command();
		ViewCatalog::delete_definition(&mut txn, TableId(10)).unwrap();
		txn.commit().unwrap();
		assert_eq!(ViewCatalog::get_definition(&store, TableId(10)).unwrap(), None);
	}

	#[test]
	fn test_edges_in_both_directions() {
		let store = MetadataStore::memory();
		let mut txn = store.begin_command();
		ViewCatalog::add_edge(&mut txn, TableId(10), TableId(1)).unwrap();
		ViewCatalog::add_edge(&mut txn, TableId(10), TableId(2)).unwrap();
		ViewCatalog::add_edge(&mut txn, TableId(11), TableId(1)).unwrap();
		txn.commit().unwrap();

		assert_eq!(ViewCatalog::sources(&store, TableId(10)).unwrap(), BTreeSet::from([TableId(1), TableId(2)]));
		assert_eq!(ViewCatalog::dependents_page(&store, TableId(1), None, 10).unwrap(), vec![TableId(10), TableId(11)]);

		let mut txn = store.begin_command();
		ViewCatalog::remove_edge(&mut txn, TableId(10), TableId(1)).unwrap();
		txn.commit().unwrap();
		assert_eq!(ViewCatalog::dependents_page(&store, TableId(1), None, 10).unwrap(), vec![TableId(11)]);
		assert_eq!(ViewCatalog::sources(&store, TableId(10)).unwrap(), BTreeSet::from([TableId(2)]));
	}

	#[test]
	fn test_dependents_paging() {
		let store = MetadataStore::memory();
		let mut txn = store.begin_command();
		for view in 100..105 {
			ViewCatalog::add_edge(&mut txn, TableId(view), TableId(1)).unwrap();
		}
		txn.commit().unwrap();

		let first = ViewCatalog::dependents_page(&store, TableId(1), None, 2).unwrap();
		assert_eq!(first, vec![TableId(100), TableId(101)]);
		let second = ViewCatalog::dependents_page(&store, TableId(1), first.last().copied(), 2).unwrap();
		assert_eq!(second, vec![TableId(102), TableId(103)]);
		let third = ViewCatalog::dependents_page(&store, TableId(1), second.last().copied(), 2).unwrap();
		assert_eq!(third, vec![TableId(104)]);
	}
}
