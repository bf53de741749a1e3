// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Logical type of a table column. Cell values travel as strings and are
/// checked against the column type before they reach an index.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
	String,
	LargeText,
	Link,
	Integer,
	Double,
	Boolean,
	/// Milliseconds since the unix epoch.
	Date,
	/// Repository entity reference, `syn123` or `123`.
	EntityId,
	StringList,
	IntegerList,
	BooleanList,
	DateList,
	EntityIdList,
}

impl ColumnType {
	pub fn is_list(&self) -> bool {
		self.element_type().is_some()
	}

	/// Element type of a list column, `None` for scalar columns.
	pub fn element_type(&self) -> Option<ColumnType> {
		match self {
			ColumnType::StringList => Some(ColumnType::String),
			ColumnType::IntegerList => Some(ColumnType::Integer),
			ColumnType::BooleanList => Some(ColumnType::Boolean),
			ColumnType::DateList => Some(ColumnType::Date),
			ColumnType::EntityIdList => Some(ColumnType::EntityId),
			_ => None,
		}
	}

	/// Returns true if `value` is a valid cell for this column type.
	pub fn accepts(&self, value: &str) -> bool {
		match self {
			ColumnType::String | ColumnType::LargeText | ColumnType::Link => true,
			ColumnType::Integer | ColumnType::Date => value.trim().parse::<i64>().is_ok(),
			ColumnType::Double => value.trim().parse::<f64>().is_ok(),
			ColumnType::Boolean => {
				let value = value.trim();
				value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
			}
			ColumnType::EntityId => {
				let value = value.trim();
				let digits = value
					.strip_prefix("syn")
					.or_else(|| value.strip_prefix("SYN"))
					.unwrap_or(value);
				!digits.is_empty() && digits.parse::<u64>().is_ok()
			}
			ColumnType::StringList => accepts_list(ColumnType::String, value),
			ColumnType::IntegerList => accepts_list(ColumnType::Integer, value),
			ColumnType::BooleanList => accepts_list(ColumnType::Boolean, value),
			ColumnType::DateList => accepts_list(ColumnType::Date, value),
			ColumnType::EntityIdList => accepts_list(ColumnType::EntityId, value),
		}
	}
}

/// A list cell is a JSON array whose items are all valid `element` values.
fn accepts_list(element: ColumnType, value: &str) -> bool {
	match serde_json::from_str::<Vec<serde_json::Value>>(value) {
		Ok(items) => items.iter().all(|item| match item {
			serde_json::Value::String(s) => element.accepts(s),
			serde_json::Value::Number(n) => element.accepts(&n.to_string()),
			serde_json::Value::Bool(b) => element.accepts(&b.to_string()),
			_ => false,
		}),
		Err(_) => false,
	}
}

impl Display for ColumnType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			ColumnType::String => "STRING",
			ColumnType::LargeText => "LARGETEXT",
			ColumnType::Link => "LINK",
			ColumnType::Integer => "INTEGER",
			ColumnType::Double => "DOUBLE",
			ColumnType::Boolean => "BOOLEAN",
			ColumnType::Date => "DATE",
			ColumnType::EntityId => "ENTITYID",
			ColumnType::StringList => "STRING_LIST",
			ColumnType::IntegerList => "INTEGER_LIST",
			ColumnType::BooleanList => "BOOLEAN_LIST",
			ColumnType::DateList => "DATE_LIST",
			ColumnType::EntityIdList => "ENTITYID_LIST",
		};
		f.write_str(name)
	}
}
