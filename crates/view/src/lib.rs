// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

//! Derived views and the physical indexes behind tables and views.
//!
//! [`ViewDependencyManager`] records which tables each view reads and turns a
//! committed table change into rebuild jobs. [`ViewBuilder`] and
//! [`TableIndexUpdater`] run those jobs, advancing each target's index status
//! through `Pending -> Processing -> {Available, Failed}`.

mod builder;
mod checksum;
mod config;
mod dependency;
mod executor;
mod table;

pub use builder::{BuildOutcome, ViewBuilder};
pub use config::ViewConfig;
pub use dependency::ViewDependencyManager;
pub use executor::RebuildExecutor;
pub use table::TableIndexUpdater;
