// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::collections::BTreeSet;

use tablelog_type::{Result, TableId};

use crate::model::ColumnModel;

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuery {
	pub referenced_tables: BTreeSet<TableId>,
	pub result_schema: Vec<ColumnModel>,
}

/// A query compiled for execution against built indexes.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
	pub query: String,
	pub sources: BTreeSet<TableId>,
	pub schema: Vec<ColumnModel>,
}

/// SQL parsing and compilation, owned outside this subsystem.
pub trait SqlTranslator: Send + Sync {
	fn parse(&self, query: &str) -> Result<ParsedQuery>;

	fn compile(&self, query: &str) -> Result<QueryPlan>;
}
