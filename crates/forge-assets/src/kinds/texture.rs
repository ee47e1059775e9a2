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

use super::digest_source;
use crate::commands::ImportTextureCommand;
use anyhow::Context;
use forge_compiler::{AssetCompiler, CompileSession};
use forge_core::asset::{Asset, AssetId, AssetItem};
use forge_core::build::BuildStep;
use forge_core::context::AssetCompilerContext;
use forge_core::result::AssetCompilerResult;
use serde::Deserialize;
use std::any::Any;
use std::fmt;
use std::path::PathBuf;

/// Option overriding the largest texture dimension, e.g. `texture.max_size=1024`.
pub const MAX_SIZE_OPTION: &str = "texture.max_size";

const THUMBNAIL_SIZE: u32 = 128;

/// GPU storage format of a compiled texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureFormat {
    #[default]
    Rgba8,
    Bc1,
    Bc3,
    Bc7,
}

impl TextureFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextureFormat::Rgba8 => "rgba8",
            TextureFormat::Bc1 => "bc1",
            TextureFormat::Bc3 => "bc3",
            TextureFormat::Bc7 => "bc7",
        }
    }
}

impl fmt::Display for TextureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An image imported as a GPU texture.
#[derive(Debug, Clone)]
pub struct TextureAsset {
    pub id: AssetId,
    pub source: PathBuf,
    pub format: TextureFormat,
    pub generate_mipmaps: bool,
}

impl Asset for TextureAsset {
    fn id(&self) -> AssetId {
        self.id
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn texture_of(item: &AssetItem) -> anyhow::Result<&TextureAsset> {
    item.downcast::<TextureAsset>()
        .with_context(|| format!("'{}' is not a texture asset", item.location()))
}

/// Reads [`MAX_SIZE_OPTION`]; an unparsable value is ignored with a warning.
fn max_size_option(
    context: &AssetCompilerContext,
    item: &AssetItem,
    result: &mut AssetCompilerResult,
) -> Option<u32> {
    let raw = context.option(MAX_SIZE_OPTION)?;
    match raw.parse::<u32>() {
        Ok(0) | Err(_) => {
            result.warning(
                format!("Ignoring {MAX_SIZE_OPTION}='{raw}': expected a positive integer"),
                Some(item),
            );
            None
        }
        Ok(size) => Some(size),
    }
}

/// Emits an [`ImportTextureCommand`] for the context's platform and
/// configuration.
pub struct TextureAssetCompiler;

impl AssetCompiler for TextureAssetCompiler {
    fn prepare(
        &self,
        context: &AssetCompilerContext,
        item: &AssetItem,
        target_location: &str,
        _session: &mut CompileSession<'_>,
    ) -> anyhow::Result<AssetCompilerResult> {
        let texture = texture_of(item)?;
        let mut result = AssetCompilerResult::new();
        let max_size = max_size_option(context, item, &mut result);

        if let Some(source_digest) = digest_source(&texture.source, item, &mut result) {
            result.build_steps.add(BuildStep::command(ImportTextureCommand {
                source: texture.source.clone(),
                source_digest,
                format: texture.format,
                generate_mipmaps: texture.generate_mipmaps,
                max_size,
                platform: context.platform,
                configuration: context.build_configuration,
                output: target_location.to_string(),
            }));
        }
        Ok(result)
    }
}

/// Emits a small uncompressed texture for editor thumbnails.
pub struct TextureThumbnailCompiler;

impl AssetCompiler for TextureThumbnailCompiler {
    fn prepare(
        &self,
        context: &AssetCompilerContext,
        item: &AssetItem,
        target_location: &str,
        _session: &mut CompileSession<'_>,
    ) -> anyhow::Result<AssetCompilerResult> {
        let texture = texture_of(item)?;
        let mut result = AssetCompilerResult::new();

        if let Some(source_digest) = digest_source(&texture.source, item, &mut result) {
            result.build_steps.add(BuildStep::command(ImportTextureCommand {
                source: texture.source.clone(),
                source_digest,
                format: TextureFormat::Rgba8,
                generate_mipmaps: false,
                max_size: Some(THUMBNAIL_SIZE),
                platform: context.platform,
                configuration: context.build_configuration,
                output: format!("{target_location}.thumbnail"),
            }));
        }
        Ok(result)
    }
}
