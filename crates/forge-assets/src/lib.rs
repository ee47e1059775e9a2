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

//! # Forge Assets
//!
//! The asset kinds shipped with the pipeline, the compilers that turn them
//! into build commands, and the loader that reads packages from disk.
//!
//! A package on disk is a directory with a `Package.toml` manifest and any
//! number of `*.asset.toml` files below its asset directories:
//!
//! ```toml
//! # Package.toml
//! name = "game"
//! version = "1.0.0"
//! dependencies = ["shared"]
//! ```
//!
//! ```toml
//! # assets/materials/table.asset.toml
//! kind = "material"
//! textures = { albedo = "assets/textures/wood" }
//! parameters = { roughness = 0.6 }
//! ```

pub mod commands;
pub mod kinds;
pub mod loader;

pub use kinds::{
    MaterialAsset, MaterialAssetCompiler, RawAsset, RawAssetCompiler, TextureAsset,
    TextureAssetCompiler, TextureFormat, TextureThumbnailCompiler,
};
pub use loader::{load_session, LoadError, LoadedSession, PackageManifest};

use forge_compiler::CompilerRegistry;
use forge_core::context::{AssetCompilationContext, ThumbnailCompilationContext};

/// Registers the compilers of every built-in asset kind.
///
/// Preview compilations fall back to the asset compilers. Thumbnails have a
/// dedicated texture compiler; other kinds fall back as well.
pub fn register_builtin_compilers(registry: &mut CompilerRegistry) {
    registry.register::<RawAsset, AssetCompilationContext>(RawAssetCompiler);
    registry.register::<TextureAsset, AssetCompilationContext>(TextureAssetCompiler);
    registry.register::<TextureAsset, ThumbnailCompilationContext>(TextureThumbnailCompiler);
    registry.register::<MaterialAsset, AssetCompilationContext>(MaterialAssetCompiler);
    log::debug!("Registered {} built-in asset compilers", registry.len());
}
