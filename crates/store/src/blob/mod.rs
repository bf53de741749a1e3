// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

mod fs;
mod memory;

pub use fs::FileBlobStore;
pub use memory::MemoryBlobStore;
