// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

//! Versioned table storage: every write to a table becomes an immutable,
//! numbered change, and materialized views over those tables are rebuilt in
//! the background when their sources move.
//!
//! [`TableService`] is the entry point; build one with
//! [`TableServiceBuilder`].

mod builder;
mod config;
mod service;

pub use builder::TableServiceBuilder;
pub use config::{BlobBackend, BlobConfig, ServiceConfig, StorageConfig};
pub use service::TableService;
pub use tablelog_core as core;
pub use tablelog_lock::{LockConfig, LockKey, LockMode, LockService, MemoryLockService};
pub use tablelog_store::{DbPath, SqliteConfig};
pub use tablelog_sub_tracing::{LogFormat, TracingBuilder, TracingConfig};
pub use tablelog_sub_worker::{PoolStats, WorkerConfig};
pub use tablelog_type::{ColumnId, ColumnType, Error, ErrorKind, Etag, Result, RowId, TableId, UserId, Version};
pub use tablelog_view::{BuildOutcome, ViewConfig};
