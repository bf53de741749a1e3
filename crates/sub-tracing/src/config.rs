// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use serde::Deserialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	#[default]
	Pretty,
	Compact,
	Json,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
	/// `EnvFilter` directives, e.g. `info,tablelog_view=debug`.
	pub filter: String,
	pub format: LogFormat,
	pub ansi: bool,
	/// Let `RUST_LOG` override `filter` when it is set.
	pub from_env: bool,
}

impl Default for TracingConfig {
	fn default() -> Self {
		Self {
			filter: "info".to_string(),
			format: LogFormat::default(),
			ansi: true,
			from_env: true,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{LogFormat, TracingConfig};

	#[test]
	fn test_deserialize() {
		let config: TracingConfig = serde_json::from_str(r#"{"format": "json", "filter": "debug"}"#).unwrap();
		assert_eq!(config.format, LogFormat::Json);
		assert_eq!(config.filter, "debug");
		assert!(config.ansi);
	}
}
