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

use forge_core::asset::AssetId;
use forge_core::build::{BuildCommand, ParameterHasher};

/// Bakes a material's parameters and texture bindings into its runtime form.
#[derive(Debug, Clone)]
pub struct CompileMaterialCommand {
    /// `(slot, texture)` pairs, sorted by slot.
    pub textures: Vec<(String, AssetId)>,
    /// `(name, value)` pairs, sorted by name.
    pub parameters: Vec<(String, f32)>,
    pub output: String,
}

impl BuildCommand for CompileMaterialCommand {
    fn kind(&self) -> &'static str {
        "compile-material"
    }

    fn title(&self) -> String {
        format!("Compile material {}", self.output)
    }

    fn output_location(&self) -> &str {
        &self.output
    }

    fn hash_parameters(&self, hasher: &mut ParameterHasher) {
        hasher.write_u64(self.textures.len() as u64);
        for (slot, texture) in &self.textures {
            hasher.write_str(slot).write_bytes(texture.as_uuid().as_bytes());
        }
        hasher.write_u64(self.parameters.len() as u64);
        for (name, value) in &self.parameters {
            hasher.write_str(name).write_f32(*value);
        }
        hasher.write_str(&self.output);
    }
}
