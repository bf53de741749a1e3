// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

//! Metadata and blob storage for the table versioning subsystem.
//!
//! Metadata lives in a [`PrimitiveStorage`] backend (memory or sqlite) and is
//! written through [`CommandTransaction`]s. Change payloads live in a
//! [`BlobStore`](tablelog_core::interface::BlobStore).

pub mod backend;
pub mod blob;
pub mod metadata;

pub use backend::{BackendStorage, DbPath, MemoryPrimitiveStorage, PrimitiveStorage, RawEntry, SqliteConfig, SqlitePrimitiveStorage};
pub use blob::{FileBlobStore, MemoryBlobStore};
pub use metadata::{CommandTransaction, MetadataRead, MetadataStore};
