// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use tablelog_core::interface::AccessControl;
use tablelog_type::{Result, TableId, UserId};

pub struct AllowAll;

impl AccessControl for AllowAll {
	fn can_write(&self, _user: UserId, _table: TableId) -> Result<bool> {
		Ok(true)
	}
}

pub struct DenyAll;

impl AccessControl for DenyAll {
	fn can_write(&self, _user: UserId, _table: TableId) -> Result<bool> {
		Ok(false)
	}
}
