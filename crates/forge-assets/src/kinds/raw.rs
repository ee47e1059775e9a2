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
use crate::commands::ImportRawCommand;
use anyhow::Context;
use forge_compiler::{AssetCompiler, CompileSession};
use forge_core::asset::{Asset, AssetId, AssetItem};
use forge_core::build::BuildStep;
use forge_core::context::AssetCompilerContext;
use forge_core::result::AssetCompilerResult;
use std::any::Any;
use std::path::PathBuf;

/// A file shipped as is.
#[derive(Debug, Clone)]
pub struct RawAsset {
    pub id: AssetId,
    pub source: PathBuf,
}

impl Asset for RawAsset {
    fn id(&self) -> AssetId {
        self.id
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Emits one [`ImportRawCommand`] per raw asset.
pub struct RawAssetCompiler;

impl AssetCompiler for RawAssetCompiler {
    fn prepare(
        &self,
        _context: &AssetCompilerContext,
        item: &AssetItem,
        target_location: &str,
        _session: &mut CompileSession<'_>,
    ) -> anyhow::Result<AssetCompilerResult> {
        let asset = item
            .downcast::<RawAsset>()
            .with_context(|| format!("'{}' is not a raw asset", item.location()))?;

        let mut result = AssetCompilerResult::new();
        if let Some(source_digest) = digest_source(&asset.source, item, &mut result) {
            result.build_steps.add(BuildStep::command(ImportRawCommand {
                source: asset.source.clone(),
                source_digest,
                output: target_location.to_string(),
            }));
        }
        Ok(result)
    }
}
