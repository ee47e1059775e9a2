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

use super::{Asset, AssetId};
use crate::package::PackageId;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// An asset bound to its logical location and owning package.
///
/// Items are cheap to clone: the asset itself is shared. The compiler only
/// reads items, it never owns or mutates them.
#[derive(Debug, Clone)]
pub struct AssetItem {
    asset: Arc<dyn Asset>,
    location: String,
    package: PackageId,
}

impl AssetItem {
    /// Binds `asset` to `location` inside `package`.
    pub fn new(location: impl Into<String>, asset: Arc<dyn Asset>, package: PackageId) -> Self {
        Self {
            asset,
            location: location.into(),
            package,
        }
    }

    /// The id of the wrapped asset.
    pub fn id(&self) -> AssetId {
        self.asset.id()
    }

    /// The logical path of the asset inside its package (e.g. `materials/rock`).
    pub fn location(&self) -> &str {
        &self.location
    }

    /// The package this item belongs to.
    pub fn package(&self) -> PackageId {
        self.package
    }

    /// The wrapped asset.
    pub fn asset(&self) -> &dyn Asset {
        self.asset.as_ref()
    }

    /// A shared handle to the wrapped asset.
    pub fn asset_arc(&self) -> Arc<dyn Asset> {
        self.asset.clone()
    }

    /// The concrete type of the wrapped asset.
    pub fn asset_type(&self) -> TypeId {
        Any::type_id(self.asset.as_any())
    }

    /// Downcasts the wrapped asset to its concrete type.
    pub fn downcast<T: Asset>(&self) -> Option<&T> {
        self.asset.as_any().downcast_ref::<T>()
    }

    /// A lightweight, serializable reference to this item.
    pub fn to_ref(&self) -> AssetRef {
        AssetRef {
            id: self.id(),
            location: self.location.clone(),
        }
    }
}

/// A serializable `(id, location)` pair identifying an asset in messages and
/// build steps without holding the asset itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef {
    /// The asset id.
    pub id: AssetId,
    /// The asset location at the time the reference was taken.
    pub location: String,
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.location, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Sound {
        id: AssetId,
    }

    impl Asset for Sound {
        fn id(&self) -> AssetId {
            self.id
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn asset_type_is_the_concrete_type() {
        let item = AssetItem::new(
            "sfx/step",
            Arc::new(Sound { id: AssetId::new() }),
            PackageId::from_name("game"),
        );
        assert_eq!(item.asset_type(), TypeId::of::<Sound>());
        assert!(item.downcast::<Sound>().is_some());
        assert!(item.asset().type_name().ends_with("Sound"));
    }

    #[test]
    fn clones_share_the_asset() {
        let item = AssetItem::new(
            "sfx/step",
            Arc::new(Sound { id: AssetId::new() }),
            PackageId::from_name("game"),
        );
        let copy = item.clone();
        assert!(Arc::ptr_eq(&item.asset_arc(), &copy.asset_arc()));
        assert_eq!(copy.to_ref(), item.to_ref());
    }
}
