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

//! Registry of per-asset compilers.

use crate::dependencies::CompileSession;
use forge_core::asset::{Asset, AssetItem};
use forge_core::context::{AssetCompilerContext, CompilationContext, CompilationContextKey};
use forge_core::result::AssetCompilerResult;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

/// Turns one asset into build steps.
///
/// Expected failures (missing source file, invalid parameters, ...) are
/// recorded as errors in the returned result. An `Err` means something
/// unexpected happened; it aborts the whole compile call.
///
/// Compilers that depend on other assets request them through `session`,
/// then [`merge`](AssetCompilerResult::merge) the dependency results into
/// their own, which nests the dependency steps inside this asset's step.
pub trait AssetCompiler: Send + Sync {
    /// Produces the build steps for `item`, writing to `target_location`.
    fn prepare(
        &self,
        context: &AssetCompilerContext,
        item: &AssetItem,
        target_location: &str,
        session: &mut CompileSession<'_>,
    ) -> anyhow::Result<AssetCompilerResult>;
}

struct Registration {
    asset_type_name: &'static str,
    compiler: Arc<dyn AssetCompiler>,
}

/// Maps `(asset type, compilation context)` pairs to compilers.
///
/// Populate it once at startup, then share it read-only (behind an `Arc`)
/// with every compilation. It has no interior mutability.
#[derive(Default)]
pub struct CompilerRegistry {
    compilers: HashMap<(TypeId, CompilationContextKey), Registration>,
}

impl CompilerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `compiler` for assets of type `A` compiled in context `C`.
    ///
    /// At most one compiler serves a pair: registering again replaces the
    /// previous compiler.
    pub fn register<A: Asset, C: CompilationContext>(
        &mut self,
        compiler: impl AssetCompiler + 'static,
    ) {
        let key = (TypeId::of::<A>(), CompilationContextKey::of::<C>());
        let asset_type_name = std::any::type_name::<A>();
        let previous = self.compilers.insert(
            key,
            Registration {
                asset_type_name,
                compiler: Arc::new(compiler),
            },
        );
        if previous.is_some() {
            log::warn!(
                "CompilerRegistry: replaced compiler for {} in the '{}' context",
                asset_type_name,
                C::NAME
            );
        } else {
            log::debug!(
                "CompilerRegistry: registered compiler for {} in the '{}' context",
                asset_type_name,
                C::NAME
            );
        }
    }

    /// Finds the compiler for `asset_type` in `context`.
    ///
    /// When the context itself has no compiler for the type, its parent
    /// contexts are tried, nearest first.
    pub fn compiler_for(
        &self,
        asset_type: TypeId,
        context: CompilationContextKey,
    ) -> Option<Arc<dyn AssetCompiler>> {
        context.lineage().into_iter().find_map(|candidate| {
            self.compilers.get(&(asset_type, candidate)).map(|entry| {
                if candidate != context {
                    log::trace!(
                        "CompilerRegistry: {} falls back from '{}' to '{}'",
                        entry.asset_type_name,
                        context,
                        candidate
                    );
                }
                entry.compiler.clone()
            })
        })
    }

    /// `true` if a compiler is registered for exactly `(A, C)`.
    pub fn contains<A: Asset, C: CompilationContext>(&self) -> bool {
        self.compilers
            .contains_key(&(TypeId::of::<A>(), CompilationContextKey::of::<C>()))
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.compilers.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.compilers.is_empty()
    }
}
