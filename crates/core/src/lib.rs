// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

//! Keys, records and collaborator interfaces shared by the table versioning
//! subsystem.

pub mod encoded;
pub mod interceptor;
pub mod interface;
pub mod key;
pub mod model;
pub mod util;

pub use encoded::{EncodedKey, EncodedKeyRange};
pub use tablelog_type::{Error, ErrorKind, Result};
