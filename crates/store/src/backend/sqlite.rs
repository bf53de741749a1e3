// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

//! SQLite implementation of [`PrimitiveStorage`]: one `kv` table with blob
//! keys, which sqlite orders bytewise.

use std::{ops::Bound, path::PathBuf, sync::Arc};

use parking_lot::Mutex;
use rusqlite::{Connection, params_from_iter, types::Value};
use serde::Deserialize;
use tablelog_type::{Result, diagnostic::store::store_error, error};
use tracing::instrument;

use super::{PrimitiveStorage, RawEntry};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "path")]
pub enum DbPath {
	Memory,
	File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SqliteConfig {
	pub path: DbPath,
	#[serde(default = "default_journal_mode")]
	pub journal_mode: String,
	#[serde(default = "default_synchronous")]
	pub synchronous: String,
}

fn default_journal_mode() -> String {
	"WAL".to_string()
}

fn default_synchronous() -> String {
	"NORMAL".to_string()
}

impl SqliteConfig {
	pub fn in_memory() -> Self {
		Self {
			path: DbPath::Memory,
			journal_mode: "MEMORY".to_string(),
			synchronous: "OFF".to_string(),
		}
	}

	pub fn file(path: impl Into<PathBuf>) -> Self {
		Self {
			path: DbPath::File(path.into()),
			journal_mode: default_journal_mode(),
			synchronous: default_synchronous(),
		}
	}

	pub fn journal_mode(mut self, mode: impl Into<String>) -> Self {
		self.journal_mode = mode.into();
		self
	}

	pub fn synchronous(mut self, mode: impl Into<String>) -> Self {
		self.synchronous = mode.into();
		self
	}
}

#[derive(Clone)]
pub struct SqlitePrimitiveStorage {
	conn: Arc<Mutex<Connection>>,
}

fn sqlite_err(e: rusqlite::Error) -> tablelog_type::Error {
	error!(store_error(e.to_string()))
}

impl SqlitePrimitiveStorage {
	#[instrument(name = "store::sqlite::new", level = "info", skip(config), fields(path = ?config.path))]
	pub fn new(config: SqliteConfig) -> Result<Self> {
		let conn = match &config.path {
			DbPath::Memory => Connection::open_in_memory(),
			DbPath::File(path) => Connection::open(path),
		}
		.map_err(sqlite_err)?;

		conn.pragma_update(None, "journal_mode", config.journal_mode.as_str()).map_err(sqlite_err)?;
		conn.pragma_update(None, "synchronous", config.synchronous.as_str()).map_err(sqlite_err)?;
		conn.execute("CREATE TABLE IF NOT EXISTS kv (key BLOB PRIMARY KEY, value BLOB NOT NULL) WITHOUT ROWID", [])
			.map_err(sqlite_err)?;

		Ok(Self {
			conn: Arc::new(Mutex::new(conn)),
		})
	}

	pub fn in_memory() -> Result<Self> {
		Self::new(SqliteConfig::in_memory())
	}
}

impl PrimitiveStorage for SqlitePrimitiveStorage {
	#[instrument(name = "store::sqlite::get", level = "trace", skip(self), fields(key_len = key.len()))]
	fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
		let conn = self.conn.lock();
		let result = conn.query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get::<_, Vec<u8>>(0));
		match result {
			Ok(value) => Ok(Some(value)),
			Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
			Err(e) => Err(sqlite_err(e)),
		}
	}

	#[instrument(name = "store::sqlite::apply", level = "trace", skip_all, fields(entries = batch.len()))]
	fn apply(&self, batch: &[(Vec<u8>, Option<Vec<u8>>)]) -> Result<()> {
		let mut conn = self.conn.lock();
		let tx = conn.transaction().map_err(sqlite_err)?;
		{
			let mut upsert = tx
				.prepare_cached("INSERT INTO kv (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value = excluded.value")
				.map_err(sqlite_err)?;
			let mut delete = tx.prepare_cached("DELETE FROM kv WHERE key = ?1").map_err(sqlite_err)?;
			for (key, value) in batch {
				match value {
					Some(value) => upsert.execute(rusqlite::params![key, value]).map_err(sqlite_err)?,
					None => delete.execute([key]).map_err(sqlite_err)?,
				};
			}
		}
		tx.commit().map_err(sqlite_err)
	}

	fn range(&self, start: Bound<&[u8]>, end: Bound<&[u8]>) -> Result<Vec<RawEntry>> {
		let mut sql = String::from("SELECT key, value FROM kv");
		let mut params: Vec<Value> = Vec::with_capacity(2);
		let mut clauses: Vec<&str> = Vec::with_capacity(2);

		match start {
			Bound::Included(key) => {
				clauses.push("key >= ?");
				params.push(Value::Blob(key.to_vec()));
			}
			Bound::Excluded(key) => {
				clauses.push("key > ?");
				params.push(Value::Blob(key.to_vec()));
			}
			Bound::Unbounded => {}
		}
		match end {
			Bound::Included(key) => {
				clauses.push("key <= ?");
				params.push(Value::Blob(key.to_vec()));
			}
			Bound::Excluded(key) => {
				clauses.push("key < ?");
				params.push(Value::Blob(key.to_vec()));
			}
			Bound::Unbounded => {}
		}
		if !clauses.is_empty() {
			sql.push_str(" WHERE ");
			sql.push_str(&clauses.join(" AND "));
		}
		sql.push_str(" ORDER BY key ASC");

		let conn = self.conn.lock();
		let mut stmt = conn.prepare_cached(&sql).map_err(sqlite_err)?;
		let rows = stmt
			.query_map(params_from_iter(params), |row| {
				Ok(RawEntry {
					key: row.get(0)?,
					value: row.get(1)?,
				})
			})
			.map_err(sqlite_err)?;

		let mut entries = Vec::new();
		for row in rows {
			entries.push(row.map_err(sqlite_err)?);
		}
		Ok(entries)
	}

	fn clear(&self) -> Result<()> {
		self.conn.lock().execute("DELETE FROM kv", []).map_err(sqlite_err)?;
		Ok(())
	}
}
