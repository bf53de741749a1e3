// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

pub mod wait;

pub use wait::{wait_for, wait_for_condition};
