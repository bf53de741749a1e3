// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::{collections::HashMap, sync::Arc};

use tablelog_core::interface::TargetKind;
use tablelog_type::{Result, TableId, diagnostic::validation::change_not_supported, return_error};

use super::{AppendableTarget, EntityViewTarget, MaterializedViewTarget, TableTarget};

/// Maps each target kind to the rules for appending to it.
#[derive(Clone)]
pub struct TargetRegistry {
	targets: HashMap<TargetKind, Arc<dyn AppendableTarget>>,
}

impl Default for TargetRegistry {
	fn default() -> Self {
		let mut registry = Self::empty();
		registry.register(Arc::new(TableTarget));
		registry.register(Arc::new(EntityViewTarget));
		registry.register(Arc::new(MaterializedViewTarget));
		registry
	}
}

impl TargetRegistry {
	pub fn empty() -> Self {
		Self {
			targets: HashMap::new(),
		}
	}

	/// Registers a target, replacing any previous one of the same kind.
	pub fn register(&mut self, target: Arc<dyn AppendableTarget>) {
		self.targets.insert(target.kind(), target);
	}

	pub fn resolve(&self, table: TableId, kind: TargetKind) -> Result<Arc<dyn AppendableTarget>> {
		match self.targets.get(&kind) {
			Some(target) => Ok(target.clone()),
			None => return_error!(change_not_supported(table, &format!("{:?}", kind), "any")),
		}
	}
}
