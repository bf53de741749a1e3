// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

//! Multi-change table transactions: access check, table lock, validation
//! (optionally against an ephemeral index snapshot), atomic apply through the
//! change log, and post-commit interceptors.

mod coordinator;
mod snapshot;
pub mod target;

pub use coordinator::TransactionCoordinator;
pub use snapshot::EphemeralSnapshot;
pub use target::{AppendableTarget, BatchState, TargetContext, TargetRegistry};
