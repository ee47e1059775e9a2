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

//! The orchestration root: compiles a whole package.

use crate::dependencies::AssetDependenciesCompiler;
use crate::registry::CompilerRegistry;
use crate::source::PackageCompilerSource;
use forge_core::context::AssetCompilerContext;
use forge_core::event::{AssetCompiledEvent, EventBus};
use forge_core::result::AssetCompilerResult;
use std::sync::Arc;

/// Compiles every asset supplied by a [`PackageCompilerSource`] into one
/// build-step graph.
///
/// Progress is broadcast as [`AssetCompiledEvent`]s, one per asset reaching a
/// terminal state, to every receiver handed out by
/// [`subscribe`](Self::subscribe).
pub struct PackageCompiler<S: PackageCompilerSource> {
    source: S,
    dependencies: AssetDependenciesCompiler,
    events: EventBus<AssetCompiledEvent>,
}

impl<S: PackageCompilerSource> PackageCompiler<S> {
    /// Creates a package compiler reading assets from `source`.
    pub fn new(source: S, registry: Arc<CompilerRegistry>) -> Self {
        Self {
            source,
            dependencies: AssetDependenciesCompiler::new(registry),
            events: EventBus::new(),
        }
    }

    /// The configured asset source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns a receiver for the compiled-asset events of future
    /// [`prepare`](Self::prepare) calls.
    pub fn subscribe(&self) -> flume::Receiver<AssetCompiledEvent> {
        self.events.subscribe()
    }

    /// Builds the complete build-step graph for the source's assets.
    ///
    /// If the source reports errors (e.g. a broken session), returns right
    /// away with those errors and without invoking any asset compiler.
    /// Otherwise the result holds the source's diagnostics followed by the
    /// compilation's.
    pub fn prepare(&self, context: &AssetCompilerContext) -> anyhow::Result<AssetCompilerResult> {
        let mut result = AssetCompilerResult::with_title("package");

        let assets = self.source.get_assets(&mut result);
        if result.has_errors() {
            log::error!("Asset source reported errors; nothing was compiled");
            return Ok(result);
        }
        log::info!(
            "Compiling {} assets for {} ({}, profile '{}', context '{}')",
            assets.len(),
            context.platform,
            context.build_configuration,
            context.profile,
            context.compilation_context
        );

        let mut forward = &self.events;
        let compiled =
            self.dependencies
                .prepare_many(context, self.source.lookup(), &assets, &mut forward)?;
        result.merge(compiled);
        Ok(result)
    }
}
