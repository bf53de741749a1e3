// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

mod key;
mod range;
mod value;

pub use key::EncodedKey;
pub use range::EncodedKeyRange;
pub use value::{decode_value, encode_value};
