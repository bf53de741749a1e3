// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

//! Collaborators the versioning core consumes but does not implement.

mod access;
mod blob;
mod index;
mod job;
mod schema;
mod translator;

pub use access::AccessControl;
pub use blob::BlobStore;
pub use index::{IndexEngine, SnapshotChange, SnapshotId};
pub use job::{JobExecutor, RebuildJob, RebuildTrigger};
pub use schema::{SchemaProvider, TargetKind};
pub use translator::{ParsedQuery, QueryPlan, SqlTranslator};
