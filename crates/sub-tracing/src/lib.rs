// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

//! Installs the process-wide `tracing` subscriber.

mod builder;
mod config;

pub use builder::TracingBuilder;
pub use config::{LogFormat, TracingConfig};
