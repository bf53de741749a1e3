// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::time::Duration;

use serde::Deserialize;
use tablelog_type::duration_ms;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
	pub threads: usize,
	/// Resubmissions of a job failing with a retryable error.
	pub max_retries: u32,
	/// Delay before the first resubmission; doubles on each further one.
	#[serde(with = "duration_ms")]
	pub retry_backoff: Duration,
	pub thread_name: String,
}

impl Default for WorkerConfig {
	fn default() -> Self {
		Self {
			threads: 2,
			max_retries: 5,
			retry_backoff: Duration::from_millis(100),
			thread_name: "tablelog-worker".to_string(),
		}
	}
}

impl WorkerConfig {
	pub fn threads(mut self, threads: usize) -> Self {
		self.threads = threads;
		self
	}

	pub fn max_retries(mut self, max_retries: u32) -> Self {
		self.max_retries = max_retries;
		self
	}

	pub fn retry_backoff(mut self, backoff: Duration) -> Self {
		self.retry_backoff = backoff;
		self
	}

	pub fn thread_name(mut self, name: impl Into<String>) -> Self {
		self.thread_name = name.into();
		self
	}

	/// Delay before resubmitting a job that has already been retried
	/// `retries` times.
	pub(crate) fn backoff_for(&self, retries: u32) -> Duration {
		self.retry_backoff.saturating_mul(1u32 << retries.min(10))
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use super::WorkerConfig;

	#[test]
	fn test_backoff_doubles() {
		let config = WorkerConfig::default().retry_backoff(Duration::from_millis(10));
		assert_eq!(config.backoff_for(0), Duration::from_millis(10));
		assert_eq!(config.backoff_for(3), Duration::from_millis(80));
	}

	#[test]
	fn test_deserialize_millis() {
		let config: WorkerConfig = serde_json::from_str(r#"{"threads": 4, "retry_backoff": 250}"#).unwrap();
		assert_eq!(config.threads, 4);
		assert_eq!(config.retry_backoff, Duration::from_millis(250));
		assert_eq!(config.max_retries, 5);
	}
}
