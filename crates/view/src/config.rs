// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
	/// Dependent views read per page when fanning out a table change.
	pub dependents_page_size: usize,
}

impl Default for ViewConfig {
	fn default() -> Self {
		Self {
			dependents_page_size: 100,
		}
	}
}

impl ViewConfig {
	pub fn dependents_page_size(mut self, size: usize) -> Self {
		self.dependents_page_size = size;
		self
	}
}
