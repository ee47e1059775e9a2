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

//! Build commands emitted by the built-in compilers.
//!
//! A command is a description of work, never the work itself: it carries
//! everything that influences its output so that its parameter hash can key
//! a build cache.

mod import;
mod material;

pub use import::{ImportRawCommand, ImportTextureCommand};
pub use material::CompileMaterialCommand;

/// BLAKE3 digest of a source file's bytes.
pub type SourceDigest = [u8; 32];
