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

//! Integrity analysis of a package session.
//!
//! Runs before any asset is touched. A session with integrity errors is not
//! compiled at all: no partial graph is built on top of a broken session.

use forge_core::asset::AssetId;
use forge_core::graph::topological_sort;
use forge_core::package::{PackageId, PackageSession};
use forge_core::result::AssetCompilerResult;
use std::collections::{HashMap, HashSet};

/// Checks a [`PackageSession`] for structural problems.
pub struct PackageSessionAnalysis<'a> {
    session: &'a PackageSession,
}

impl<'a> PackageSessionAnalysis<'a> {
    /// Prepares an analysis of `session`.
    pub fn new(session: &'a PackageSession) -> Self {
        Self { session }
    }

    /// Runs every check, recording findings in `result`.
    ///
    /// Returns `true` when no error was found. Warnings (dangling asset
    /// references) do not make the session unusable.
    pub fn run(&self, result: &mut AssetCompilerResult) -> bool {
        let errors_before = result.errors().count();

        self.check_package_names(result);
        self.check_package_dependencies(result);
        self.check_dependency_cycles(result);
        self.check_assets(result);

        let found = result.errors().count() - errors_before;
        if found > 0 {
            log::error!("Package session analysis found {found} error(s)");
        } else {
            log::debug!(
                "Package session analysis passed ({} packages)",
                self.session.packages().len()
            );
        }
        found == 0
    }

    fn check_package_names(&self, result: &mut AssetCompilerResult) {
        let mut seen = HashSet::new();
        for package in self.session.packages() {
            if !seen.insert(package.name()) {
                result.error(
                    format!("Package '{}' is loaded more than once", package.name()),
                    None,
                );
            }
        }
    }

    fn check_package_dependencies(&self, result: &mut AssetCompilerResult) {
        for package in self.session.packages() {
            for dependency in package.dependencies() {
                if self.session.package_by_name(dependency).is_none() {
                    result.error(
                        format!(
                            "Package '{}' depends on '{}', which is not loaded",
                            package.name(),
                            dependency
                        ),
                        None,
                    );
                }
            }
        }
    }

    fn check_dependency_cycles(&self, result: &mut AssetCompilerResult) {
        let packages = self.session.packages();
        let ids: Vec<PackageId> = packages.iter().map(|p| p.id()).collect();
        let edges: Vec<(PackageId, PackageId)> = packages
            .iter()
            .flat_map(|package| {
                package.dependencies().iter().filter_map(move |name| {
                    self.session
                        .package_by_name(name)
                        .map(|dependency| (dependency.id(), package.id()))
                })
            })
            .collect();

        if let Err(cycle) = topological_sort(ids, edges) {
            let names: Vec<&str> = cycle
                .unresolved
                .iter()
                .filter_map(|id| self.session.package(*id))
                .map(|p| p.name())
                .collect();
            result.error(
                format!(
                    "Package dependencies form a cycle; cannot order: {}",
                    names.join(", ")
                ),
                None,
            );
        }
    }

    fn check_assets(&self, result: &mut AssetCompilerResult) {
        let mut owners: HashMap<AssetId, String> = HashMap::new();
        let known: HashSet<AssetId> = self.session.all_assets().map(|item| item.id()).collect();

        for package in self.session.packages() {
            let mut locations = HashSet::new();
            for item in package.assets() {
                if item.location().trim().is_empty() {
                    result.error(
                        format!("Asset {} in package '{}' has an empty location", item.id(), package.name()),
                        Some(item),
                    );
                } else if !locations.insert(item.location()) {
                    result.error(
                        format!(
                            "Location '{}' is used by more than one asset in package '{}'",
                            item.location(),
                            package.name()
                        ),
                        Some(item),
                    );
                }

                let qualified = format!("{}:{}", package.name(), item.location());
                if let Some(owner) = owners.get(&item.id()) {
                    result.error(
                        format!("Asset id {} is already used by '{}'", item.id(), owner),
                        Some(item),
                    );
                } else {
                    owners.insert(item.id(), qualified);
                }

                for reference in item.asset().references() {
                    if !known.contains(&reference) {
                        result.warning(
                            format!("References asset {reference}, which is not part of any loaded package"),
                            Some(item),
                        );
                    }
                }
            }
        }
    }
}
