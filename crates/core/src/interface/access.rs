// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use tablelog_type::{Result, TableId, UserId};

pub trait AccessControl: Send + Sync {
	fn can_write(&self, user: UserId, table: TableId) -> Result<bool>;
}
