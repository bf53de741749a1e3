// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

//! A pool of named OS threads running index rebuild jobs.
//!
//! Jobs travel over a crossbeam channel. A job failing with a retryable error
//! is parked and resubmitted after an exponential backoff, up to the
//! configured number of retries.

mod config;
mod pool;
mod stats;

pub use config::WorkerConfig;
pub use pool::WorkerPool;
pub use stats::PoolStats;
