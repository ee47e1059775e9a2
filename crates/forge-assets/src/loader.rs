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

//! Reads packages from disk.
//!
//! Layout of a package directory:
//!
//! - `Package.toml`: name, version, dependency names and asset directories;
//! - `<asset directory>/**/*.asset.toml`: one asset each, tagged by `kind`.
//!
//! Dependencies are looked up as sibling directories of the root package,
//! named after the dependency. An asset's location is its path relative to
//! the package directory, with forward slashes and without the
//! `.asset.toml` suffix. Assets without an explicit `id` get one derived
//! from `<package>:<location>`, so ids are stable across runs.
//!
//! A material names its textures by id or by location. A location is looked
//! up in the material's own package first, then in the packages it depends
//! on, directly or not. It must match exactly one asset there.

use crate::kinds::{MaterialAsset, RawAsset, TextureAsset, TextureFormat};
use forge_core::asset::{Asset, AssetId};
use forge_core::package::{Package, PackageId, PackageSession};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use walkdir::WalkDir;

/// File name of a package manifest.
pub const PACKAGE_MANIFEST: &str = "Package.toml";
/// Suffix of asset definition files.
pub const ASSET_FILE_SUFFIX: &str = ".asset.toml";

/// Errors raised while loading packages from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("'{}' is not a package: no Package.toml found", .0.display())]
    NotAPackage(PathBuf),
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to scan asset directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Asset '{location}' of package '{package}' references '{reference}', which is neither an asset id nor a single location visible from that package")]
    UnresolvedReference {
        package: String,
        location: String,
        reference: String,
    },
}

/// The `Package.toml` manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageManifest {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Directories scanned for asset files, relative to the package.
    #[serde(default = "default_asset_directories")]
    pub asset_directories: Vec<PathBuf>,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_asset_directories() -> Vec<PathBuf> {
    vec![PathBuf::from("assets")]
}

fn enabled() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum AssetDefinition {
    Raw {
        id: Option<AssetId>,
        source: PathBuf,
    },
    Texture {
        id: Option<AssetId>,
        source: PathBuf,
        #[serde(default)]
        format: TextureFormat,
        #[serde(default = "enabled")]
        generate_mipmaps: bool,
    },
    Material {
        id: Option<AssetId>,
        /// Slot name to texture id or texture location.
        #[serde(default)]
        textures: BTreeMap<String, String>,
        #[serde(default)]
        parameters: BTreeMap<String, f32>,
    },
}

impl AssetDefinition {
    fn explicit_id(&self) -> Option<AssetId> {
        match self {
            AssetDefinition::Raw { id, .. }
            | AssetDefinition::Texture { id, .. }
            | AssetDefinition::Material { id, .. } => *id,
        }
    }
}

/// An asset file found on disk, parsed but not yet turned into an asset.
#[derive(Debug)]
struct DiscoveredAsset {
    location: String,
    path: PathBuf,
    id: AssetId,
    definition: AssetDefinition,
}

#[derive(Debug)]
struct DiscoveredPackage {
    manifest: PackageManifest,
    assets: Vec<DiscoveredAsset>,
}

/// A session loaded from disk together with the package it was loaded for.
#[derive(Debug)]
pub struct LoadedSession {
    pub session: PackageSession,
    pub root: PackageId,
}

/// Reads the manifest of the package in `dir`.
pub fn read_manifest(dir: &Path) -> Result<PackageManifest, LoadError> {
    let path = dir.join(PACKAGE_MANIFEST);
    if !path.is_file() {
        return Err(LoadError::NotAPackage(dir.to_path_buf()));
    }
    let text = fs::read_to_string(&path).map_err(|source| LoadError::Io {
        path: path.clone(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| LoadError::Parse { path, source })
}

/// Lists the asset files of a package, as `(location, path)` pairs sorted by
/// path within each asset directory.
pub fn find_asset_files(
    dir: &Path,
    manifest: &PackageManifest,
) -> Result<Vec<(String, PathBuf)>, LoadError> {
    let mut files = Vec::new();
    for asset_dir in &manifest.asset_directories {
        let root = dir.join(asset_dir);
        if !root.is_dir() {
            log::warn!(
                "Package '{}': asset directory '{}' does not exist",
                manifest.name,
                root.display()
            );
            continue;
        }
        for entry in WalkDir::new(&root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(location) = asset_location(dir, entry.path()) {
                files.push((location, entry.into_path()));
            }
        }
    }
    Ok(files)
}

/// `dir/assets/textures/wood.asset.toml` -> `assets/textures/wood`.
fn asset_location(package_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(package_dir).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|part| part.as_os_str().to_string_lossy())
        .collect();
    let joined = parts.join("/");
    joined
        .strip_suffix(ASSET_FILE_SUFFIX)
        .filter(|location| !location.is_empty())
        .map(str::to_string)
}

fn discover_package(dir: &Path, manifest: PackageManifest) -> Result<DiscoveredPackage, LoadError> {
    let mut assets = Vec::new();
    for (location, path) in find_asset_files(dir, &manifest)? {
        let text = fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        let definition: AssetDefinition =
            toml::from_str(&text).map_err(|source| LoadError::Parse {
                path: path.clone(),
                source,
            })?;
        let id = definition
            .explicit_id()
            .unwrap_or_else(|| AssetId::new_v5(&format!("{}:{}", manifest.name, location)));
        assets.push(DiscoveredAsset {
            location,
            path,
            id,
            definition,
        });
    }
    log::debug!(
        "Package '{}': found {} asset files in '{}'",
        manifest.name,
        assets.len(),
        dir.display()
    );
    Ok(DiscoveredPackage { manifest, assets })
}

/// Loads the package in `root` and, transitively, its dependencies.
///
/// A dependency without a matching sibling directory is skipped with a
/// warning; the session analysis reports it when compiling.
pub fn load_session(root: &Path) -> Result<LoadedSession, LoadError> {
    if !root.join(PACKAGE_MANIFEST).is_file() {
        return Err(LoadError::NotAPackage(root.to_path_buf()));
    }
    // `.` has no usable parent, siblings are only found from an absolute path.
    let root = fs::canonicalize(root).map_err(|source| LoadError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    let search_dir = root.parent().unwrap_or(root.as_path()).to_path_buf();
    let mut pending = VecDeque::from([root.clone()]);
    let mut visited = HashSet::new();
    let mut discovered = Vec::new();

    while let Some(dir) = pending.pop_front() {
        if !visited.insert(dir.clone()) {
            continue;
        }
        let manifest = read_manifest(&dir)?;
        for dependency in &manifest.dependencies {
            let dependency_dir = search_dir.join(dependency);
            if dependency_dir.join(PACKAGE_MANIFEST).is_file() {
                pending.push_back(dependency_dir);
            } else {
                log::warn!(
                    "Package '{}' depends on '{}', but '{}' holds no package",
                    manifest.name,
                    dependency,
                    dependency_dir.display()
                );
            }
        }
        discovered.push(discover_package(&dir, manifest)?);
    }

    let locations = LocationIndex::new(&discovered);
    let mut session = PackageSession::new();
    let mut root_id = None;
    for package in discovered {
        let id = session.add_package(build_package(package, &locations)?);
        if root_id.is_none() {
            root_id = Some(id);
        }
    }
    let root = root_id.ok_or(LoadError::NotAPackage(root))?;
    Ok(LoadedSession { session, root })
}

/// Asset ids by package and location, with the packages each package can see.
#[derive(Debug, Default)]
struct LocationIndex {
    ids: HashMap<(String, String), AssetId>,
    /// Package name to its transitive dependencies, nearest first.
    visible: HashMap<String, Vec<String>>,
}

impl LocationIndex {
    fn new(packages: &[DiscoveredPackage]) -> Self {
        let mut index = Self::default();
        let dependencies: HashMap<&str, &[String]> = packages
            .iter()
            .map(|package| (package.manifest.name.as_str(), package.manifest.dependencies.as_slice()))
            .collect();

        for package in packages {
            let name = &package.manifest.name;
            for asset in &package.assets {
                index
                    .ids
                    .insert((name.clone(), asset.location.clone()), asset.id);
            }

            let mut seen = HashSet::from([name.as_str()]);
            let mut pending: VecDeque<&str> = package
                .manifest
                .dependencies
                .iter()
                .map(String::as_str)
                .collect();
            let mut closure = Vec::new();
            while let Some(dependency) = pending.pop_front() {
                if !seen.insert(dependency) {
                    continue;
                }
                closure.push(dependency.to_string());
                if let Some(next) = dependencies.get(dependency) {
                    pending.extend(next.iter().map(String::as_str));
                }
            }
            index.visible.insert(name.clone(), closure);
        }
        index
    }

    fn get(&self, package: &str, location: &str) -> Option<AssetId> {
        self.ids
            .get(&(package.to_string(), location.to_string()))
            .copied()
    }

    /// Resolves `reference`, made by the asset at `referrer` in `package`.
    fn resolve(&self, package: &str, referrer: &str, reference: &str) -> Result<AssetId, LoadError> {
        if let Ok(id) = reference.parse::<AssetId>() {
            return Ok(id);
        }
        if let Some(id) = self.get(package, reference) {
            return Ok(id);
        }

        let matches: Vec<AssetId> = self
            .visible
            .get(package)
            .into_iter()
            .flatten()
            .filter_map(|dependency| self.get(dependency, reference))
            .collect();
        match matches.as_slice() {
            [id] => Ok(*id),
            _ => {
                if matches.len() > 1 {
                    log::error!(
                        "Package '{}': '{}' exists in {} dependencies",
                        package,
                        reference,
                        matches.len()
                    );
                }
                Err(LoadError::UnresolvedReference {
                    package: package.to_string(),
                    location: referrer.to_string(),
                    reference: reference.to_string(),
                })
            }
        }
    }
}

fn build_package(
    discovered: DiscoveredPackage,
    locations: &LocationIndex,
) -> Result<Package, LoadError> {
    let manifest = discovered.manifest;
    let mut package = Package::new(manifest.name.clone(), manifest.version);
    for dependency in manifest.dependencies {
        package.add_dependency(dependency);
    }

    for asset in discovered.assets {
        let base = asset.path.parent().unwrap_or(Path::new("")).to_path_buf();
        let loaded: Arc<dyn Asset> = match asset.definition {
            AssetDefinition::Raw { source, .. } => Arc::new(RawAsset {
                id: asset.id,
                source: base.join(source),
            }),
            AssetDefinition::Texture {
                source,
                format,
                generate_mipmaps,
                ..
            } => Arc::new(TextureAsset {
                id: asset.id,
                source: base.join(source),
                format,
                generate_mipmaps,
            }),
            AssetDefinition::Material {
                textures,
                parameters,
                ..
            } => {
                let mut bound = BTreeMap::new();
                for (slot, reference) in textures {
                    bound.insert(
                        slot,
                        locations.resolve(&manifest.name, &asset.location, &reference)?,
                    );
                }
                Arc::new(MaterialAsset {
                    id: asset.id,
                    textures: bound,
                    parameters,
                })
            }
        };
        package.add_asset(asset.location, loaded);
    }
    Ok(package)
}
