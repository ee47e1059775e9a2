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

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A marker type selecting which family of compilers applies.
///
/// Compilers are registered per `(asset type, compilation context)` pair.
/// A context may name a parent: when no compiler is registered for the
/// context itself, lookup continues with the parent.
pub trait CompilationContext: 'static {
    /// A human-readable name used in diagnostics.
    const NAME: &'static str;

    /// The context to fall back to when no compiler matches this one.
    fn parent() -> Option<CompilationContextKey> {
        None
    }
}

/// A runtime handle on a [`CompilationContext`] marker type.
///
/// Equality and hashing only consider the marker type.
#[derive(Clone, Copy)]
pub struct CompilationContextKey {
    type_id: TypeId,
    name: &'static str,
    parent: fn() -> Option<CompilationContextKey>,
}

impl CompilationContextKey {
    /// The key of the marker type `C`.
    pub fn of<C: CompilationContext>() -> Self {
        Self {
            type_id: TypeId::of::<C>(),
            name: C::NAME,
            parent: C::parent,
        }
    }

    /// The marker type id.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The context name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The fallback context, if any.
    pub fn parent(&self) -> Option<CompilationContextKey> {
        (self.parent)()
    }

    /// This context followed by its parents, nearest first.
    ///
    /// Stops if a parent chain loops back onto a context already visited.
    pub fn lineage(&self) -> Vec<CompilationContextKey> {
        let mut chain = vec![*self];
        let mut current = self.parent();
        while let Some(key) = current {
            if chain.contains(&key) {
                break;
            }
            chain.push(key);
            current = key.parent();
        }
        chain
    }
}

impl PartialEq for CompilationContextKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for CompilationContextKey {}

impl Hash for CompilationContextKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for CompilationContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for CompilationContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Default for CompilationContextKey {
    fn default() -> Self {
        Self::of::<AssetCompilationContext>()
    }
}

/// Compiling assets for a final build.
pub struct AssetCompilationContext;

impl CompilationContext for AssetCompilationContext {
    const NAME: &'static str = "Asset";
}

/// Compiling assets for live preview in tooling.
pub struct PreviewCompilationContext;

impl CompilationContext for PreviewCompilationContext {
    const NAME: &'static str = "Preview";

    fn parent() -> Option<CompilationContextKey> {
        Some(CompilationContextKey::of::<AssetCompilationContext>())
    }
}

/// Compiling thumbnails for asset browsers.
pub struct ThumbnailCompilationContext;

impl CompilationContext for ThumbnailCompilationContext {
    const NAME: &'static str = "Thumbnail";

    fn parent() -> Option<CompilationContextKey> {
        Some(CompilationContextKey::of::<AssetCompilationContext>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_falls_back_to_asset() {
        let lineage = CompilationContextKey::of::<PreviewCompilationContext>().lineage();
        let names: Vec<&str> = lineage.iter().map(|k| k.name()).collect();
        assert_eq!(names, vec!["Preview", "Asset"]);
    }

    #[test]
    fn keys_compare_by_marker_type() {
        assert_eq!(
            CompilationContextKey::of::<AssetCompilationContext>(),
            CompilationContextKey::default()
        );
        assert_ne!(
            CompilationContextKey::of::<AssetCompilationContext>(),
            CompilationContextKey::of::<ThumbnailCompilationContext>()
        );
    }
}
