// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use serde::{Deserialize, Serialize};
use tablelog_type::{ColumnId, ColumnType};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnModel {
	pub id: ColumnId,
	pub name: String,
	pub column_type: ColumnType,
}

impl ColumnModel {
	pub fn new(id: impl Into<ColumnId>, name: impl Into<String>, column_type: ColumnType) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			column_type,
		}
	}
}

/// One column-level edit: add (`old` unset), remove (`new` unset) or replace.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnChange {
	pub old: Option<ColumnId>,
	pub new: Option<ColumnId>,
}

impl ColumnChange {
	pub fn add(column: ColumnId) -> Self {
		Self {
			old: None,
			new: Some(column),
		}
	}

	pub fn remove(column: ColumnId) -> Self {
		Self {
			old: Some(column),
			new: None,
		}
	}

	pub fn replace(old: ColumnId, new: ColumnId) -> Self {
		Self {
			old: Some(old),
			new: Some(new),
		}
	}

	/// Applies a list of edits to an ordered column list.
	pub fn apply_all(current: &[ColumnId], changes: &[ColumnChange]) -> Vec<ColumnId> {
		let mut columns = current.to_vec();
		for change in changes {
			match (change.old, change.new) {
				(Some(old), Some(new)) => {
					if let Some(slot) = columns.iter_mut().find(|c| **c == old) {
						*slot = new;
					} else if !columns.contains(&new) {
						columns.push(new);
					}
				}
				(Some(old), None) => columns.retain(|c| *c != old),
				(None, Some(new)) => {
					if !columns.contains(&new) {
						columns.push(new);
					}
				}
				(None, None) => {}
			}
		}
		columns
	}
}

/// Payload of a column change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaChangeSet {
	pub changes: Vec<ColumnChange>,
	/// The table's ordered column ids after the change.
	pub columns: Vec<ColumnId>,
}

#[cfg(test)]
mod tests {
	use tablelog_type::ColumnId;

	use super::ColumnChange;

	#[test]
	fn test_apply_all() {
		let current = [ColumnId(1), ColumnId(2), ColumnId(3)];
		let changes = [
			ColumnChange::replace(ColumnId(2), ColumnId(20)),
			ColumnChange::remove(ColumnId(1)),
			ColumnChange::add(ColumnId(4)),
			ColumnChange::add(ColumnId(3)),
		];
		assert_eq!(ColumnChange::apply_all(&current, &changes), vec![ColumnId(20), ColumnId(3), ColumnId(4)]);
	}
}
