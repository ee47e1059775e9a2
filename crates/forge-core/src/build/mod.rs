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

//! The build-step graph produced by asset compilation.
//!
//! Compilation does not run anything: it builds a tree of [`BuildStep`]s.
//! Leaves wrap [`BuildCommand`]s keyed by a content-derived
//! [`ParameterHash`]; composites ([`ListBuildStep`], [`AssetBuildStep`]) order
//! them. A downstream execution engine consumes the tree (or its flattened
//! [`BuildIndex`]) and may skip any command whose hash it has already built.

mod hash;
mod index;
mod step;

pub use hash::*;
pub use index::*;
pub use step::*;
