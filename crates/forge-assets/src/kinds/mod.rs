// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Built-in asset kinds and their compilers.

mod material;
mod raw;
mod texture;

pub use material::{MaterialAsset, MaterialAssetCompiler};
pub use raw::{RawAsset, RawAssetCompiler};
pub use texture::{TextureAsset, TextureAssetCompiler, TextureFormat, TextureThumbnailCompiler};

use crate::commands::SourceDigest;
use forge_core::asset::AssetItem;
use forge_core::result::AssetCompilerResult;
use std::path::Path;

/// Hashes the content of `path`, or records an error against `item` when the
/// file cannot be read.
pub(crate) fn digest_source(
    path: &Path,
    item: &AssetItem,
    result: &mut AssetCompilerResult,
) -> Option<SourceDigest> {
    match std::fs::read(path) {
        Ok(bytes) => Some(*blake3::hash(&bytes).as_bytes()),
        Err(err) => {
            result.error(
                format!("Cannot read source file '{}': {}", path.display(), err),
                Some(item),
            );
            None
        }
    }
}
