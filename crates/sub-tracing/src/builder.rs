// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use tablelog_type::{Result, internal_err};
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{LogFormat, TracingConfig};

/// Builds and installs a `tracing-subscriber` registry with one formatting
/// layer behind an `EnvFilter`.
#[derive(Debug, Clone)]
pub struct TracingBuilder {
	config: TracingConfig,
	thread_names: bool,
}

impl Default for TracingBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl TracingBuilder {
	pub fn new() -> Self {
		Self::from_config(TracingConfig::default())
	}

	pub fn from_config(config: TracingConfig) -> Self {
		Self {
			config,
			thread_names: true,
		}
	}

	pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
		self.config.filter = filter.into();
		self
	}

	pub fn with_format(mut self, format: LogFormat) -> Self {
		self.config.format = format;
		self
	}

	pub fn with_ansi(mut self, ansi: bool) -> Self {
		self.config.ansi = ansi;
		self
	}

	pub fn with_thread_names(mut self, thread_names: bool) -> Self {
		self.thread_names = thread_names;
		self
	}

	/// Ignore `RUST_LOG` and use only the configured filter.
	pub fn without_env(mut self) -> Self {
		self.config.from_env = false;
		self
	}

	pub fn env_filter(&self) -> Result<EnvFilter> {
		if self.config.from_env {
			if let Ok(filter) = EnvFilter::try_from_default_env() {
				return Ok(filter);
			}
		}
		match EnvFilter::try_new(&self.config.filter) {
			Ok(filter) => Ok(filter),
			Err(err) => internal_err!("invalid log filter '{}': {}", self.config.filter, err),
		}
	}

	fn layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
		let layer = tracing_subscriber::fmt::layer().with_ansi(self.config.ansi).with_thread_names(self.thread_names);
		match self.config.format {
			LogFormat::Pretty => layer.pretty().boxed(),
			LogFormat::Compact => layer.compact().boxed(),
			LogFormat::Json => layer.json().boxed(),
		}
	}

	/// Installs the subscriber globally. Fails if one is already installed.
	pub fn init(self) -> Result<()> {
		let filter = self.env_filter()?;
		let subscriber = tracing_subscriber::registry().with(self.layer().with_filter(filter));
		match subscriber.try_init() {
			Ok(()) => Ok(()),
			Err(err) => internal_err!("failed to install tracing subscriber: {}", err),
		}
	}
}
