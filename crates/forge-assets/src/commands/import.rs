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

use super::SourceDigest;
use crate::kinds::TextureFormat;
use forge_core::build::{BuildCommand, ParameterHasher};
use forge_core::context::{BuildConfiguration, Platform};
use std::path::PathBuf;

/// Copies a source file verbatim into the build output.
#[derive(Debug, Clone)]
pub struct ImportRawCommand {
    pub source: PathBuf,
    pub source_digest: SourceDigest,
    pub output: String,
}

impl BuildCommand for ImportRawCommand {
    fn kind(&self) -> &'static str {
        "import-raw"
    }

    fn title(&self) -> String {
        format!("Import {}", self.source.display())
    }

    fn output_location(&self) -> &str {
        &self.output
    }

    fn hash_parameters(&self, hasher: &mut ParameterHasher) {
        hasher
            .write_str(&self.source.to_string_lossy())
            .write_bytes(&self.source_digest)
            .write_str(&self.output);
    }
}

/// Converts a source image into a GPU texture for one target.
#[derive(Debug, Clone)]
pub struct ImportTextureCommand {
    pub source: PathBuf,
    pub source_digest: SourceDigest,
    pub format: TextureFormat,
    pub generate_mipmaps: bool,
    /// Largest allowed width or height; `None` keeps the source size.
    pub max_size: Option<u32>,
    pub platform: Platform,
    pub configuration: BuildConfiguration,
    pub output: String,
}

impl BuildCommand for ImportTextureCommand {
    fn kind(&self) -> &'static str {
        "import-texture"
    }

    fn title(&self) -> String {
        format!(
            "Import texture {} ({}, {})",
            self.source.display(),
            self.format,
            self.platform
        )
    }

    fn output_location(&self) -> &str {
        &self.output
    }

    fn hash_parameters(&self, hasher: &mut ParameterHasher) {
        hasher
            .write_str(&self.source.to_string_lossy())
            .write_bytes(&self.source_digest)
            .write_str(self.format.as_str())
            .write_bool(self.generate_mipmaps)
            .write_u64(self.max_size.map_or(0, u64::from))
            .write_str(self.platform.as_str())
            .write_str(self.configuration.as_str())
            .write_str(&self.output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::build::BuildStep;

    fn texture() -> ImportTextureCommand {
        ImportTextureCommand {
            source: PathBuf::from("wood.png"),
            source_digest: [7; 32],
            format: TextureFormat::Bc7,
            generate_mipmaps: true,
            max_size: None,
            platform: Platform::Windows,
            configuration: BuildConfiguration::Release,
            output: "textures/wood".into(),
        }
    }

    fn hash(command: ImportTextureCommand) -> forge_core::build::ParameterHash {
        BuildStep::command(command).parameter_hash()
    }

    #[test]
    fn texture_hash_tracks_the_target() {
        let base = hash(texture());
        assert_eq!(base, hash(texture()));

        let mut other_platform = texture();
        other_platform.platform = Platform::Android;
        assert_ne!(base, hash(other_platform));

        let mut other_configuration = texture();
        other_configuration.configuration = BuildConfiguration::Debug;
        assert_ne!(base, hash(other_configuration));
    }

    #[test]
    fn texture_hash_tracks_source_content() {
        let mut edited = texture();
        edited.source_digest = [8; 32];
        assert_ne!(hash(texture()), hash(edited));
    }

    #[test]
    fn raw_and_texture_hashes_never_collide() {
        let raw = BuildStep::command(ImportRawCommand {
            source: PathBuf::from("wood.png"),
            source_digest: [7; 32],
            output: "textures/wood".into(),
        });
        assert_ne!(raw.parameter_hash(), hash(texture()));
    }
}
