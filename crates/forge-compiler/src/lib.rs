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

//! # Forge Compiler
//!
//! Turns a package (and the packages it depends on) into a build-step graph.
//!
//! - [`CompilerRegistry`] maps `(asset type, compilation context)` to the
//!   [`AssetCompiler`] in charge.
//! - [`PackageSessionAnalysis`] checks the session before anything compiles.
//! - [`PackageAssetEnumerator`] yields every asset of a package closure.
//! - [`AssetDependenciesCompiler`] compiles a list of assets, pulling in the
//!   assets they depend on, each at most once per call.
//! - [`PackageCompiler`] ties the above together and broadcasts progress.

#![warn(missing_docs)]

pub mod analysis;
pub mod dependencies;
pub mod package_compiler;
pub mod registry;
pub mod source;

pub use analysis::PackageSessionAnalysis;
pub use dependencies::{AssetDependenciesCompiler, CompileSession, Dependency, DependencyStatus};
pub use package_compiler::PackageCompiler;
pub use registry::{AssetCompiler, CompilerRegistry};
pub use source::{PackageAssetEnumerator, PackageCompilerSource};
