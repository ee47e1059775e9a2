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

//! Configuration carried through a compilation.
//!
//! A [`CompilerContext`] holds the free-form property bag and string option
//! overrides. An [`AssetCompilerContext`] adds the build target (platform,
//! profile, configuration), the owning package and the
//! [`CompilationContextKey`] that selects which compilers apply.
//!
//! # Cloning
//!
//! `Clone` is shallow: a clone shares its property bag and option map with
//! the original, while plain fields (platform, profile, ...) are copied.
//! Callers that need a clone whose maps evolve independently must use
//! [`CompilerContext::isolate`].

mod compilation;
mod properties;

pub use compilation::*;
pub use properties::*;

use crate::package::PackageId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Target platform of a compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Platform {
    /// Microsoft Windows.
    #[default]
    Windows,
    /// Linux desktop.
    Linux,
    /// Apple macOS.
    MacOS,
    /// Android devices.
    Android,
    /// Apple iOS devices.
    IOS,
    /// Browsers through WebAssembly.
    Web,
}

impl Platform {
    /// The lowercase platform name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Linux => "linux",
            Platform::MacOS => "macos",
            Platform::Android => "android",
            Platform::IOS => "ios",
            Platform::Web => "web",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "windows" => Ok(Platform::Windows),
            "linux" => Ok(Platform::Linux),
            "macos" => Ok(Platform::MacOS),
            "android" => Ok(Platform::Android),
            "ios" => Ok(Platform::IOS),
            "web" => Ok(Platform::Web),
            other => Err(format!("unknown platform '{other}'")),
        }
    }
}

/// Build configuration of a compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BuildConfiguration {
    /// Unoptimized output with debug information.
    #[default]
    Debug,
    /// Optimized output.
    Release,
    /// Optimized output for store submission.
    AppStore,
}

impl BuildConfiguration {
    /// The lowercase configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildConfiguration::Debug => "debug",
            BuildConfiguration::Release => "release",
            BuildConfiguration::AppStore => "appstore",
        }
    }
}

impl fmt::Display for BuildConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildConfiguration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(BuildConfiguration::Debug),
            "release" => Ok(BuildConfiguration::Release),
            "appstore" => Ok(BuildConfiguration::AppStore),
            other => Err(format!("unknown build configuration '{other}'")),
        }
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Free-form configuration shared by every compiler.
#[derive(Debug, Clone, Default)]
pub struct CompilerContext {
    properties: Arc<RwLock<PropertyBag>>,
    option_properties: Arc<RwLock<HashMap<String, String>>>,
}

impl CompilerContext {
    /// Creates a context with empty maps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a typed property. Visible through every shallow clone.
    pub fn set_property<T: Send + Sync + 'static>(&self, key: PropertyKey<T>, value: T) {
        write(&self.properties).set(key, value);
    }

    /// Reads a typed property.
    pub fn property<T: Clone + Send + Sync + 'static>(&self, key: PropertyKey<T>) -> Option<T> {
        read(&self.properties).get(key)
    }

    /// Sets a string option override (e.g. from the command line).
    /// Visible through every shallow clone.
    pub fn set_option(&self, name: impl Into<String>, value: impl Into<String>) {
        write(&self.option_properties).insert(name.into(), value.into());
    }

    /// Reads a string option override.
    pub fn option(&self, name: &str) -> Option<String> {
        read(&self.option_properties).get(name).cloned()
    }

    /// A snapshot of every option override.
    pub fn options(&self) -> HashMap<String, String> {
        read(&self.option_properties).clone()
    }

    /// Returns a copy whose property bag and option map are independent
    /// from this context's.
    pub fn isolate(&self) -> Self {
        Self {
            properties: Arc::new(RwLock::new(read(&self.properties).clone())),
            option_properties: Arc::new(RwLock::new(self.options())),
        }
    }

    /// `true` if `self` and `other` share their maps (one is a shallow clone
    /// of the other).
    pub fn shares_state_with(&self, other: &CompilerContext) -> bool {
        Arc::ptr_eq(&self.properties, &other.properties)
            && Arc::ptr_eq(&self.option_properties, &other.option_properties)
    }
}

/// The configuration threaded through an asset compilation.
///
/// Created once per top-level compile request and passed by reference
/// through the whole recursive compilation.
#[derive(Debug, Clone, Default)]
pub struct AssetCompilerContext {
    /// Property bag and option overrides.
    pub base: CompilerContext,
    /// Target platform.
    pub platform: Platform,
    /// Named build profile (e.g. `"Default"`, `"Mobile"`).
    pub profile: String,
    /// Build configuration.
    pub build_configuration: BuildConfiguration,
    /// The package being compiled.
    pub package: Option<PackageId>,
    /// Selects which family of compilers applies.
    pub compilation_context: CompilationContextKey,
}

impl AssetCompilerContext {
    /// Creates a context for a final build on the default platform.
    pub fn new() -> Self {
        Self {
            profile: "Default".to_string(),
            ..Self::default()
        }
    }

    /// Sets the target platform.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Sets the build profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Sets the build configuration.
    pub fn with_build_configuration(mut self, configuration: BuildConfiguration) -> Self {
        self.build_configuration = configuration;
        self
    }

    /// Sets the package being compiled.
    pub fn with_package(mut self, package: PackageId) -> Self {
        self.package = Some(package);
        self
    }

    /// Selects the compilation context marker `C`.
    pub fn with_compilation_context<C: CompilationContext>(mut self) -> Self {
        self.compilation_context = CompilationContextKey::of::<C>();
        self
    }

    /// Ends the context's scope.
    ///
    /// No resources are attached to a context today; call sites still end the
    /// scope explicitly so that attaching some later does not change them.
    pub fn dispose(self) {
        log::trace!(
            "Disposing compiler context ({} / {} / {})",
            self.platform,
            self.profile,
            self.build_configuration
        );
    }
}

impl std::ops::Deref for AssetCompilerContext {
    type Target = CompilerContext;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUALITY: PropertyKey<u8> = PropertyKey::new("quality");

    #[test]
    fn clone_shares_option_overrides() {
        let original = AssetCompilerContext::new();
        let clone = original.clone();

        clone.set_option("texture.compress", "false");
        assert_eq!(
            original.option("texture.compress").as_deref(),
            Some("false")
        );

        clone.set_property(QUALITY, 3);
        assert_eq!(original.property(QUALITY), Some(3));
        assert!(clone.base.shares_state_with(&original.base));
    }

    #[test]
    fn clone_copies_plain_fields() {
        let original = AssetCompilerContext::new().with_platform(Platform::Linux);
        let mut clone = original.clone();
        clone.platform = Platform::Android;
        clone.profile = "Mobile".into();

        assert_eq!(original.platform, Platform::Linux);
        assert_eq!(original.profile, "Default");
    }

    #[test]
    fn isolate_detaches_maps() {
        let original = CompilerContext::new();
        original.set_option("a", "1");
        let isolated = original.isolate();

        isolated.set_option("a", "2");
        isolated.set_property(QUALITY, 1);

        assert_eq!(original.option("a").as_deref(), Some("1"));
        assert_eq!(isolated.option("a").as_deref(), Some("2"));
        assert_eq!(original.property(QUALITY), None);
        assert!(!isolated.shares_state_with(&original));
    }

    #[test]
    fn platform_and_configuration_parse() {
        assert_eq!("Linux".parse::<Platform>(), Ok(Platform::Linux));
        assert!("amiga".parse::<Platform>().is_err());
        assert_eq!(
            "release".parse::<BuildConfiguration>(),
            Ok(BuildConfiguration::Release)
        );
    }
}
