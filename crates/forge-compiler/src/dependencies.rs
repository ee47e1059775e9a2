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

//! Dependency-aware compilation of asset lists.
//!
//! Every asset moves through `unvisited -> resolving -> compiling ->
//! compiled`. The state map lives in a [`CompileSession`] created per
//! [`AssetDependenciesCompiler::prepare_many`] call and shared by every
//! nested compiler, so within one call:
//!
//! - each asset id is compiled at most once, whatever the number of paths
//!   leading to it (no duplicate steps, no duplicate messages);
//! - reaching an asset that is still resolving or compiling is a cycle: the
//!   requester gets a warning and the asset is not re-entered.

use crate::registry::CompilerRegistry;
use anyhow::Context;
use forge_core::asset::{AssetId, AssetItem};
use forge_core::build::AssetBuildStep;
use forge_core::context::AssetCompilerContext;
use forge_core::event::CompilationObserver;
use forge_core::package::AssetLookup;
use forge_core::result::AssetCompilerResult;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompileState {
    Resolving,
    Compiling,
    Compiled { failed: bool },
}

/// How a dependency request was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyStatus {
    /// The dependency was compiled by this request; its result is attached.
    Compiled,
    /// The dependency had already been compiled earlier in this session.
    /// Its steps and messages were delivered to whoever compiled it first.
    AlreadyCompiled {
        /// Whether that earlier compilation reported errors.
        failed: bool,
    },
    /// The dependency is still being compiled further up the call stack
    /// (a cycle). It was not re-entered.
    InProgress,
    /// No loaded package contains the dependency.
    Missing,
}

impl DependencyStatus {
    /// `true` when the dependency cannot be relied upon.
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            DependencyStatus::Missing | DependencyStatus::AlreadyCompiled { failed: true }
        )
    }
}

/// The outcome of [`CompileSession::compile_dependency`].
#[derive(Debug)]
pub struct Dependency {
    /// How the request was served.
    pub status: DependencyStatus,
    /// The partial result to merge into the requester's result.
    pub result: AssetCompilerResult,
}

/// Shared state of one compile call.
///
/// Per-asset compilers receive it to request their dependencies.
pub struct CompileSession<'a> {
    registry: &'a CompilerRegistry,
    lookup: &'a dyn AssetLookup,
    observer: &'a mut dyn CompilationObserver,
    states: HashMap<AssetId, CompileState>,
}

impl<'a> CompileSession<'a> {
    /// Creates a session with no asset visited yet.
    pub fn new(
        registry: &'a CompilerRegistry,
        lookup: &'a dyn AssetLookup,
        observer: &'a mut dyn CompilationObserver,
    ) -> Self {
        Self {
            registry,
            lookup,
            observer,
            states: HashMap::new(),
        }
    }

    /// `true` once `id` reached a terminal state in this session.
    pub fn is_compiled(&self, id: AssetId) -> bool {
        matches!(self.states.get(&id), Some(CompileState::Compiled { .. }))
    }

    /// Number of assets that reached a terminal state.
    pub fn compiled_count(&self) -> usize {
        self.states
            .values()
            .filter(|state| matches!(state, CompileState::Compiled { .. }))
            .count()
    }

    /// Requests compilation of the asset `id` on behalf of `requester`.
    ///
    /// Missing assets are reported as errors and cycles as warnings, both
    /// attributed to the requester, inside the returned result.
    pub fn compile_dependency(
        &mut self,
        context: &AssetCompilerContext,
        requester: &AssetItem,
        id: AssetId,
    ) -> anyhow::Result<Dependency> {
        let mut result = AssetCompilerResult::new();
        match self.states.get(&id).copied() {
            Some(CompileState::Compiled { failed }) => {
                return Ok(Dependency {
                    status: DependencyStatus::AlreadyCompiled { failed },
                    result,
                });
            }
            Some(CompileState::Resolving | CompileState::Compiling) => {
                result.warning(
                    format!("Circular dependency on asset {id}, which is still being compiled; the reference is not followed again"),
                    Some(requester),
                );
                return Ok(Dependency {
                    status: DependencyStatus::InProgress,
                    result,
                });
            }
            None => {}
        }

        let Some(item) = self.lookup.find_asset(id) else {
            result.error(
                format!("Referenced asset {id} is not part of any loaded package"),
                Some(requester),
            );
            return Ok(Dependency {
                status: DependencyStatus::Missing,
                result,
            });
        };

        let result = self.compile(context, &item)?;
        Ok(Dependency {
            status: DependencyStatus::Compiled,
            result,
        })
    }

    /// Compiles `item` unless it was already visited in this session.
    ///
    /// Returns `None` for assets already compiled or in progress.
    pub fn compile_once(
        &mut self,
        context: &AssetCompilerContext,
        item: &AssetItem,
    ) -> anyhow::Result<Option<AssetCompilerResult>> {
        if self.states.contains_key(&item.id()) {
            log::trace!("Skipping '{}': already visited", item.location());
            return Ok(None);
        }
        self.compile(context, item).map(Some)
    }

    fn compile(
        &mut self,
        context: &AssetCompilerContext,
        item: &AssetItem,
    ) -> anyhow::Result<AssetCompilerResult> {
        let id = item.id();
        self.states.insert(id, CompileState::Resolving);

        let Some(compiler) = self
            .registry
            .compiler_for(item.asset_type(), context.compilation_context)
        else {
            let mut result = AssetCompilerResult::new();
            result.error(
                format!(
                    "No compiler registered for asset type '{}' in the '{}' compilation context",
                    item.asset().type_name(),
                    context.compilation_context
                ),
                Some(item),
            );
            return Ok(self.finish(item, result));
        };

        self.states.insert(id, CompileState::Compiling);
        log::debug!("Compiling '{}' ({})", item.location(), id);

        let mut result = compiler
            .prepare(context, item, item.location(), self)
            .with_context(|| format!("Unexpected failure while compiling asset '{}'", item.location()))?;

        let steps = result.build_steps.take_steps();
        if !steps.is_empty() || !result.has_errors() {
            let mut asset_step = AssetBuildStep::new(item);
            asset_step.extend(steps);
            result.build_steps.add(asset_step);
        }
        Ok(self.finish(item, result))
    }

    fn finish(&mut self, item: &AssetItem, result: AssetCompilerResult) -> AssetCompilerResult {
        let failed = result.has_errors();
        self.states
            .insert(item.id(), CompileState::Compiled { failed });
        if failed {
            log::debug!("Compiled '{}' with errors", item.location());
        }
        self.observer.on_asset_compiled(item, &result);
        result
    }
}

/// Compiles lists of assets together with everything they depend on.
#[derive(Clone)]
pub struct AssetDependenciesCompiler {
    registry: Arc<CompilerRegistry>,
}

impl AssetDependenciesCompiler {
    /// Creates a compiler backed by `registry`.
    pub fn new(registry: Arc<CompilerRegistry>) -> Self {
        Self { registry }
    }

    /// The registry compilers are looked up in.
    pub fn registry(&self) -> &CompilerRegistry {
        &self.registry
    }

    /// Compiles every asset of `items`, in order, plus the assets they pull
    /// in through `lookup`.
    ///
    /// Missing compilers and compiler-reported errors are recorded and the
    /// batch continues; the returned result lists every failure. An `Err` from
    /// a per-asset compiler aborts the call and is returned as is.
    ///
    /// `observer` is notified once per asset reaching a terminal state,
    /// dependencies before their requesters.
    pub fn prepare_many(
        &self,
        context: &AssetCompilerContext,
        lookup: &dyn AssetLookup,
        items: &[AssetItem],
        observer: &mut dyn CompilationObserver,
    ) -> anyhow::Result<AssetCompilerResult> {
        let start = Instant::now();
        let mut session = CompileSession::new(&self.registry, lookup, observer);
        let mut aggregate = AssetCompilerResult::with_title("assets");

        for item in items {
            if let Some(result) = session.compile_once(context, item)? {
                aggregate.merge(result);
            }
        }

        log::info!(
            "Prepared {} assets ({} requested) into {} top-level build steps in {:.2}s",
            session.compiled_count(),
            items.len(),
            aggregate.build_steps.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(aggregate)
    }

    /// Compiles a single asset and its dependencies.
    pub fn prepare(
        &self,
        context: &AssetCompilerContext,
        lookup: &dyn AssetLookup,
        item: &AssetItem,
        observer: &mut dyn CompilationObserver,
    ) -> anyhow::Result<AssetCompilerResult> {
        self.prepare_many(context, lookup, std::slice::from_ref(item), observer)
    }
}
