// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use tablelog_core::interface::{IndexEngine, SnapshotChange, SnapshotId};
use tablelog_type::{Result, TableId};
use tracing::{debug, warn};

/// A private copy of a table index used to validate changes before they are
/// applied. The copy is dropped when the guard goes out of scope.
pub struct EphemeralSnapshot<'a> {
	engine: &'a dyn IndexEngine,
	id: SnapshotId,
}

impl<'a> EphemeralSnapshot<'a> {
	pub fn create(engine: &'a dyn IndexEngine, source: TableId) -> Result<Self> {
		let id = engine.create_snapshot(source)?;
		debug!(source = %source, snapshot = id.0, "created ephemeral snapshot");
		Ok(Self {
			engine,
			id,
		})
	}

	pub fn id(&self) -> SnapshotId {
		self.id
	}

	pub fn validate(&self, change: SnapshotChange<'_>) -> Result<()> {
		self.engine.validate_change(self.id, change)
	}
}

impl Drop for EphemeralSnapshot<'_> {
	fn drop(&mut self) {
		if let Err(err) = self.engine.drop_snapshot(self.id) {
			warn!(snapshot = self.id.0, error = %err, "failed to drop ephemeral snapshot");
		}
	}
}
