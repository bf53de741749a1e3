// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

//! In-memory collaborators and helpers for tablelog tests.

pub mod access;
pub mod index;
pub mod schema;
pub mod tempdir;
pub mod translator;
pub mod trigger;
pub mod util;

pub use access::{AllowAll, DenyAll};
pub use index::MemoryIndexEngine;
pub use schema::MemorySchemaProvider;
pub use translator::StaticTranslator;
pub use trigger::RecordingTrigger;
