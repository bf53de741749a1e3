// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::collections::{BTreeSet, HashMap};

use parking_lot::RwLock;
use tablelog_core::{
	interface::{ParsedQuery, QueryPlan, SqlTranslator},
	model::ColumnModel,
};
use tablelog_type::{Result, TableId, diagnostic::validation::invalid_query, return_error};

/// Answers only the queries registered with it.
#[derive(Default)]
pub struct StaticTranslator {
	queries: RwLock<HashMap<String, ParsedQuery>>,
}

impl StaticTranslator {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&self, query: &str, sources: impl IntoIterator<Item = TableId>, schema: Vec<ColumnModel>) {
		self.queries.write().insert(
			query.to_string(),
			ParsedQuery {
				referenced_tables: sources.into_iter().collect::<BTreeSet<_>>(),
				result_schema: schema,
			},
		);
	}
}

impl SqlTranslator for StaticTranslator {
	fn parse(&self, query: &str) -> Result<ParsedQuery> {
		match self.queries.read().get(query) {
			Some(parsed) => Ok(parsed.clone()),
			None => return_error!(invalid_query(query, "query is not registered")),
		}
	}

	fn compile(&self, query: &str) -> Result<QueryPlan> {
		let parsed = self.parse(query)?;
		Ok(QueryPlan {
			query: query.to_string(),
			sources: parsed.referenced_tables,
			schema: parsed.result_schema,
		})
	}
}
