// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the unix epoch, zero if the clock is before it.
pub fn now_millis() -> u64 {
	SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}
