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

use crate::commands::CompileMaterialCommand;
use anyhow::Context;
use forge_compiler::{AssetCompiler, CompileSession, DependencyStatus};
use forge_core::asset::{Asset, AssetId, AssetItem};
use forge_core::build::BuildStep;
use forge_core::context::AssetCompilerContext;
use forge_core::result::AssetCompilerResult;
use std::any::Any;
use std::collections::BTreeMap;

/// Texture bindings plus scalar shading parameters.
#[derive(Debug, Clone, Default)]
pub struct MaterialAsset {
    pub id: AssetId,
    /// Texture asset bound to each slot.
    pub textures: BTreeMap<String, AssetId>,
    pub parameters: BTreeMap<String, f32>,
}

impl Asset for MaterialAsset {
    fn id(&self) -> AssetId {
        self.id
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn references(&self) -> Vec<AssetId> {
        self.textures.values().copied().collect()
    }
}

/// Compiles the bound textures first, then emits a
/// [`CompileMaterialCommand`].
///
/// The material command is only emitted when every texture compiled.
pub struct MaterialAssetCompiler;

impl AssetCompiler for MaterialAssetCompiler {
    fn prepare(
        &self,
        context: &AssetCompilerContext,
        item: &AssetItem,
        target_location: &str,
        session: &mut CompileSession<'_>,
    ) -> anyhow::Result<AssetCompilerResult> {
        let material = item
            .downcast::<MaterialAsset>()
            .with_context(|| format!("'{}' is not a material asset", item.location()))?;

        let mut result = AssetCompilerResult::new();
        let mut textures_ok = true;
        for (slot, texture) in &material.textures {
            let dependency = session.compile_dependency(context, item, *texture)?;
            let failed = dependency.result.has_errors();
            result.merge(dependency.result);

            match dependency.status {
                DependencyStatus::AlreadyCompiled { failed: true } => {
                    // Its own errors went to whoever compiled it first.
                    result.error(
                        format!("Texture bound to slot '{slot}' failed to compile"),
                        Some(item),
                    );
                    textures_ok = false;
                }
                DependencyStatus::Missing => textures_ok = false,
                _ if failed => textures_ok = false,
                _ => {}
            }
        }

        if textures_ok {
            result.build_steps.add(BuildStep::command(CompileMaterialCommand {
                textures: material
                    .textures
                    .iter()
                    .map(|(slot, id)| (slot.clone(), *id))
                    .collect(),
                parameters: material
                    .parameters
                    .iter()
                    .map(|(name, value)| (name.clone(), *value))
                    .collect(),
                output: target_location.to_string(),
            }));
        } else {
            log::debug!("Skipping material command for '{}'", item.location());
        }
        Ok(result)
    }
}
