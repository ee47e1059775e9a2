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

//! Packages, sessions and asset lookup.
//!
//! A [`Package`] is a versioned collection of assets with declared dependencies
//! on other packages (by name). A [`PackageSession`] is the set of all loaded
//! packages; it resolves dependency edges and answers id-based asset queries.

use crate::asset::{name_uuid, Asset, AssetId, AssetItem};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// The stable identity of a package, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PackageId(Uuid);

impl PackageId {
    /// Derives the id of the package called `name`.
    pub fn from_name(name: &str) -> Self {
        Self(name_uuid(&format!("package:{name}")))
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A versioned collection of assets.
#[derive(Debug, Clone)]
pub struct Package {
    id: PackageId,
    name: String,
    version: String,
    dependencies: Vec<String>,
    assets: Vec<AssetItem>,
}

impl Package {
    /// Creates an empty package.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: PackageId::from_name(&name),
            name,
            version: version.into(),
            dependencies: Vec::new(),
            assets: Vec::new(),
        }
    }

    /// Declares a dependency on the package called `name`.
    pub fn with_dependency(mut self, name: impl Into<String>) -> Self {
        self.add_dependency(name);
        self
    }

    /// Declares a dependency on the package called `name`. Duplicates are ignored.
    pub fn add_dependency(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.dependencies.contains(&name) {
            self.dependencies.push(name);
        }
    }

    /// Adds an asset at `location` and returns the created item.
    pub fn add_asset(&mut self, location: impl Into<String>, asset: Arc<dyn Asset>) -> AssetItem {
        let item = AssetItem::new(location, asset, self.id);
        self.assets.push(item.clone());
        item
    }

    /// Removes the asset with the given id, returning its item.
    pub fn remove_asset(&mut self, id: AssetId) -> Option<AssetItem> {
        let index = self.assets.iter().position(|item| item.id() == id)?;
        Some(self.assets.remove(index))
    }

    /// Finds an asset of this package by id.
    pub fn find_asset(&self, id: AssetId) -> Option<&AssetItem> {
        self.assets.iter().find(|item| item.id() == id)
    }

    /// The package id.
    pub fn id(&self) -> PackageId {
        self.id
    }

    /// The package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The package version string.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Names of the packages this package depends on, in declaration order.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// The assets of this package, in declaration order.
    pub fn assets(&self) -> &[AssetItem] {
        &self.assets
    }
}

/// Id-based asset resolution across packages.
///
/// The dependency compiler uses this to follow references from one asset to
/// another, possibly in a different package.
pub trait AssetLookup {
    /// Returns the item for `id`, if any loaded package contains it.
    fn find_asset(&self, id: AssetId) -> Option<AssetItem>;
}

/// The set of all currently loaded packages.
#[derive(Debug, Clone, Default)]
pub struct PackageSession {
    packages: Vec<Package>,
}

impl PackageSession {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a package to the session and returns its id.
    ///
    /// The session does not validate the package here; duplicate names or
    /// broken dependencies are reported by integrity analysis.
    pub fn add_package(&mut self, package: Package) -> PackageId {
        let id = package.id();
        log::debug!(
            "Session: added package '{}' v{} ({} assets)",
            package.name(),
            package.version(),
            package.assets().len()
        );
        self.packages.push(package);
        id
    }

    /// All packages, in load order.
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// Returns the package with the given id.
    pub fn package(&self, id: PackageId) -> Option<&Package> {
        self.packages.iter().find(|p| p.id() == id)
    }

    /// Returns a mutable reference to the package with the given id.
    pub fn package_mut(&mut self, id: PackageId) -> Option<&mut Package> {
        self.packages.iter_mut().find(|p| p.id() == id)
    }

    /// Returns the first package called `name`.
    pub fn package_by_name(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.name() == name)
    }

    /// Returns the package followed by every package it transitively depends
    /// on, depth-first in declaration order, each package once.
    ///
    /// Dependencies missing from the session are skipped; integrity analysis
    /// is responsible for reporting them. Returns an empty list when `id` is
    /// not part of the session.
    pub fn packages_with_dependencies(&self, id: PackageId) -> Vec<&Package> {
        let mut ordered = Vec::new();
        let mut visited = HashSet::new();
        if let Some(root) = self.package(id) {
            self.collect_dependencies(root, &mut visited, &mut ordered);
        }
        ordered
    }

    fn collect_dependencies<'a>(
        &'a self,
        package: &'a Package,
        visited: &mut HashSet<PackageId>,
        ordered: &mut Vec<&'a Package>,
    ) {
        if !visited.insert(package.id()) {
            return;
        }
        ordered.push(package);
        for name in package.dependencies() {
            if let Some(dependency) = self.package_by_name(name) {
                self.collect_dependencies(dependency, visited, ordered);
            }
        }
    }

    /// Iterates over every asset of every package, in load order.
    pub fn all_assets(&self) -> impl Iterator<Item = &AssetItem> {
        self.packages.iter().flat_map(|p| p.assets().iter())
    }
}

impl AssetLookup for PackageSession {
    fn find_asset(&self, id: AssetId) -> Option<AssetItem> {
        self.packages
            .iter()
            .find_map(|p| p.find_asset(id))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;

    #[derive(Debug)]
    struct Blob(AssetId);

    impl Asset for Blob {
        fn id(&self) -> AssetId {
            self.0
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn names(packages: &[&Package]) -> Vec<String> {
        packages.iter().map(|p| p.name().to_string()).collect()
    }

    #[test]
    fn dependency_closure_is_depth_first_and_unique() {
        let mut session = PackageSession::new();
        let game = session.add_package(
            Package::new("game", "1.0")
                .with_dependency("ui")
                .with_dependency("core"),
        );
        session.add_package(Package::new("ui", "1.0").with_dependency("core"));
        session.add_package(Package::new("core", "1.0"));
        session.add_package(Package::new("unrelated", "1.0"));

        let closure = session.packages_with_dependencies(game);
        assert_eq!(names(&closure), vec!["game", "ui", "core"]);
    }

    #[test]
    fn closure_skips_missing_dependencies_and_survives_cycles() {
        let mut session = PackageSession::new();
        let a = session.add_package(
            Package::new("a", "1.0")
                .with_dependency("missing")
                .with_dependency("b"),
        );
        session.add_package(Package::new("b", "1.0").with_dependency("a"));

        assert_eq!(names(&session.packages_with_dependencies(a)), vec!["a", "b"]);
    }

    #[test]
    fn lookup_crosses_packages() {
        let mut session = PackageSession::new();
        let mut core = Package::new("core", "1.0");
        let id = AssetId::new();
        core.add_asset("shared/blob", Arc::new(Blob(id)));
        session.add_package(Package::new("game", "1.0"));
        session.add_package(core);

        let found = session.find_asset(id).unwrap();
        assert_eq!(found.location(), "shared/blob");
        assert_eq!(found.package(), PackageId::from_name("core"));
        assert!(session.find_asset(AssetId::new()).is_none());
    }

    #[test]
    fn remove_asset_drops_it_from_the_package() {
        let mut package = Package::new("game", "1.0");
        let id = AssetId::new();
        package.add_asset("a", Arc::new(Blob(id)));
        assert!(package.remove_asset(id).is_some());
        assert!(package.find_asset(id).is_none());
        assert!(package.remove_asset(id).is_none());
    }
}
