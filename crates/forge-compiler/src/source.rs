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

//! Sources of assets for the package compiler.

use crate::analysis::PackageSessionAnalysis;
use forge_core::asset::AssetItem;
use forge_core::package::{AssetLookup, PackageId, PackageSession};
use forge_core::result::AssetCompilerResult;
use std::sync::Arc;

/// Supplies the assets a [`PackageCompiler`](crate::PackageCompiler) compiles.
pub trait PackageCompilerSource {
    /// Returns the assets to compile.
    ///
    /// Problems are recorded in `result`; if it has errors afterwards the
    /// package compiler stops without compiling anything.
    fn get_assets(&self, result: &mut AssetCompilerResult) -> Vec<AssetItem>;

    /// Resolves asset references while compiling.
    fn lookup(&self) -> &dyn AssetLookup;
}

/// Enumerates every asset of a package and of the packages it depends on.
pub struct PackageAssetEnumerator {
    session: Arc<PackageSession>,
    package: PackageId,
}

impl PackageAssetEnumerator {
    /// Enumerates `package` within `session`.
    pub fn new(session: Arc<PackageSession>, package: PackageId) -> Self {
        Self { session, package }
    }

    /// The session being enumerated.
    pub fn session(&self) -> &PackageSession {
        &self.session
    }

    /// Runs integrity analysis right away and returns an iterator over the
    /// package closure. Only the walk over the assets is lazy: diagnostics
    /// are in `result` as soon as this returns.
    ///
    /// Assets come package by package in dependency-closure order (the
    /// package first), each package in its own declaration order. Nothing is
    /// sorted. If the analysis reports an error, or the package is not part
    /// of the session, the iterator is empty and the errors are in `result`.
    ///
    /// Every call re-runs the analysis.
    pub fn assets<'s>(
        &'s self,
        result: &mut AssetCompilerResult,
    ) -> impl Iterator<Item = &'s AssetItem> + 's {
        let healthy = PackageSessionAnalysis::new(&self.session).run(result);
        let packages = if !healthy {
            Vec::new()
        } else if self.session.package(self.package).is_none() {
            result.error(
                format!("Package {} is not part of the session", self.package),
                None,
            );
            Vec::new()
        } else {
            self.session.packages_with_dependencies(self.package)
        };
        packages.into_iter().flat_map(|package| package.assets().iter())
    }
}

impl PackageCompilerSource for PackageAssetEnumerator {
    fn get_assets(&self, result: &mut AssetCompilerResult) -> Vec<AssetItem> {
        self.assets(result).cloned().collect()
    }

    fn lookup(&self) -> &dyn AssetLookup {
        self.session.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::asset::{Asset, AssetId};
    use forge_core::package::Package;
    use std::any::Any;

    #[derive(Debug)]
    struct Leaf(AssetId);

    impl Asset for Leaf {
        fn id(&self) -> AssetId {
            self.0
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn package(name: &str, deps: &[&str], locations: &[&str]) -> Package {
        let mut package = Package::new(name, "1.0");
        for dep in deps {
            package.add_dependency(*dep);
        }
        for location in locations {
            package.add_asset(*location, Arc::new(Leaf(AssetId::new())));
        }
        package
    }

    fn locations<'a>(items: impl Iterator<Item = &'a AssetItem>) -> Vec<String> {
        items.map(|item| item.location().to_string()).collect()
    }

    #[test]
    fn yields_package_then_dependencies_in_declaration_order() {
        let mut session = PackageSession::new();
        let game = session.add_package(package("game", &["core"], &["z-level", "a-hero"]));
        session.add_package(package("core", &[], &["shader", "font"]));
        session.add_package(package("tools", &[], &["gizmo"]));

        let enumerator = PackageAssetEnumerator::new(Arc::new(session), game);
        let mut result = AssetCompilerResult::new();
        let found = locations(enumerator.assets(&mut result));

        assert_eq!(found, vec!["z-level", "a-hero", "shader", "font"]);
        assert!(!result.has_errors());
    }

    #[test]
    fn broken_session_yields_nothing() {
        let mut session = PackageSession::new();
        let game = session.add_package(package("game", &["missing"], &["hero"]));

        let enumerator = PackageAssetEnumerator::new(Arc::new(session), game);
        let mut result = AssetCompilerResult::new();
        assert_eq!(enumerator.assets(&mut result).count(), 0);
        assert!(result.has_errors());
    }

    #[test]
    fn analysis_runs_before_iteration() {
        let mut session = PackageSession::new();
        let game = session.add_package(package("game", &["missing"], &["hero"]));

        let enumerator = PackageAssetEnumerator::new(Arc::new(session), game);
        let mut result = AssetCompilerResult::new();
        let assets = enumerator.assets(&mut result);
        assert!(result.has_errors());
        assert_eq!(assets.count(), 0);
    }

    #[test]
    fn unknown_package_yields_nothing() {
        let session = PackageSession::new();
        let enumerator =
            PackageAssetEnumerator::new(Arc::new(session), PackageId::from_name("nope"));
        let mut result = AssetCompilerResult::new();
        assert!(enumerator.get_assets(&mut result).is_empty());
        assert!(result.has_errors());
    }

    #[test]
    fn every_enumeration_reruns_the_analysis() {
        let mut session = PackageSession::new();
        let game = session.add_package(package("game", &["missing"], &["hero"]));
        let enumerator = PackageAssetEnumerator::new(Arc::new(session), game);

        let mut result = AssetCompilerResult::new();
        enumerator.get_assets(&mut result);
        enumerator.get_assets(&mut result);
        assert_eq!(result.errors().count(), 2);
    }
}
