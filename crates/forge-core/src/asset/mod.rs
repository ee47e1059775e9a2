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

//! Provides the foundational traits and primitive types for forge assets.
//!
//! - The [`Asset`] trait: the contract every compilable content definition
//!   implements (materials, textures, raw file imports, ...).
//! - [`AssetId`]: the stable identity of an asset.
//! - [`AssetItem`]: an asset bound to its location and owning package, the
//!   unit the compiler operates on.

mod id;
mod item;

pub use id::*;
pub use item::*;

use std::any::Any;
use std::fmt::Debug;

/// A named, typed content definition owned by a package.
///
/// The concrete type of an asset (reached through [`Asset::as_any`]) selects
/// the compiler that turns it into build steps, so two asset kinds must be two
/// distinct Rust types.
///
/// # Examples
///
/// ```
/// use forge_core::asset::{Asset, AssetId};
/// use std::any::Any;
///
/// #[derive(Debug)]
/// struct SoundAsset {
///     id: AssetId,
/// }
///
/// impl Asset for SoundAsset {
///     fn id(&self) -> AssetId {
///         self.id
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
/// ```
pub trait Asset: Debug + Send + Sync + 'static {
    /// The stable identity of this asset.
    fn id(&self) -> AssetId;

    /// Returns `self` as `Any`, exposing the concrete type for compiler lookup.
    fn as_any(&self) -> &dyn Any;

    /// A human-readable name for the asset kind, used in diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Ids of the other assets this asset refers to.
    ///
    /// Integrity analysis uses this to detect dangling references. Compilers
    /// decide on their own which references are compile-time dependencies.
    fn references(&self) -> Vec<AssetId> {
        Vec::new()
    }
}
