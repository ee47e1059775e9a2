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

//! # Forge Core
//!
//! Foundational crate for the forge asset pipeline. It holds the data model
//! every other crate speaks: asset identities, packages and sessions, the
//! build-step graph produced by compilation, compiler contexts and the
//! result/log aggregation container.
//!
//! Nothing in here knows how a particular asset is compiled. Concrete
//! compilers live in higher-level crates and only exchange these types.

#![warn(missing_docs)]

pub mod asset;
pub mod build;
pub mod context;
pub mod event;
pub mod graph;
pub mod package;
pub mod result;

pub use asset::{Asset, AssetId, AssetItem, AssetRef};
pub use build::{AssetBuildStep, BuildStep, ListBuildStep, ParameterHash, ResultStatus};
pub use context::{AssetCompilerContext, CompilerContext};
pub use package::{AssetLookup, Package, PackageId, PackageSession};
pub use result::{AssetCompilerResult, LogMessage, Severity};
