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

use anyhow::Result;
use forge_core::asset::{Asset, AssetId, AssetItem};
use forge_core::build::{
    AssetBuildStep, BuildCommand, BuildIndex, BuildStep, ListBuildStep, ParameterHasher,
};
use forge_core::package::PackageId;
use std::any::Any;
use std::sync::Arc;
use tempfile::tempdir;

// --- Test Setup: a conversion command and a trivial asset ---
#[derive(Debug)]
struct Convert {
    source: &'static str,
    output: &'static str,
    quality: u64,
}

impl BuildCommand for Convert {
    fn kind(&self) -> &'static str {
        "convert"
    }

    fn title(&self) -> String {
        format!("convert {} -> {}", self.source, self.output)
    }

    fn output_location(&self) -> &str {
        self.output
    }

    fn hash_parameters(&self, hasher: &mut ParameterHasher) {
        hasher.write_str(self.source);
        hasher.write_str(self.output);
        hasher.write_u64(self.quality);
    }
}

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

fn item(location: &str) -> AssetItem {
    AssetItem::new(
        location,
        Arc::new(Blob(AssetId::new_v5(location))),
        PackageId::from_name("tests"),
    )
}

fn convert(source: &'static str, output: &'static str, quality: u64) -> BuildStep {
    BuildStep::command(Convert {
        source,
        output,
        quality,
    })
}
// ---

#[test]
fn identical_commands_share_one_entry() {
    let mut shared = AssetBuildStep::new(&item("textures/wood"));
    shared.add(convert("wood.png", "wood.tex", 80));

    let mut user = AssetBuildStep::new(&item("materials/table"));
    user.add(convert("wood.png", "wood.tex", 80));
    user.add(convert("table.mat", "table.bin", 0));

    let mut root = ListBuildStep::new("package");
    root.add(shared);
    root.add(user);

    let index = BuildIndex::from_list(&root);
    assert_eq!(index.len(), 2);

    let first = &index.entries()[0];
    assert_eq!(first.occurrences, 2);
    assert_eq!(first.kind, "convert");
    // Attributed to the asset it was first seen under.
    assert_eq!(
        first.asset.as_ref().map(|a| a.location.as_str()),
        Some("textures/wood")
    );
    assert_eq!(index.entries()[1].occurrences, 1);
    assert!(index.output_conflicts().is_empty());
}

#[test]
fn different_parameters_for_one_output_are_conflicts() {
    let mut root = ListBuildStep::new("package");
    root.add(convert("wood.png", "wood.tex", 80));
    root.add(convert("wood.png", "wood.tex", 95));

    let index = BuildIndex::from_list(&root);
    assert_eq!(index.len(), 2);

    let conflicts = index.output_conflicts();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts["wood.tex"].len(), 2);
    assert_eq!(conflicts["wood.tex"][0], index.entries()[0].hash);
}

#[test]
fn commands_outside_asset_steps_have_no_owner() {
    let step = convert("a.png", "a.tex", 1);
    let index = BuildIndex::from_step(&step);
    assert_eq!(index.len(), 1);
    assert!(index.entries()[0].asset.is_none());
    assert!(index.get(&step.parameter_hash()).is_some());
}

#[test]
fn index_survives_a_trip_through_disk() -> Result<()> {
    let dir = tempdir()?;
    let index_path = dir.path().join("index.bin");

    let mut asset = AssetBuildStep::new(&item("textures/stone"));
    asset.add(convert("stone.png", "stone.tex", 70));
    let mut root = ListBuildStep::new("package");
    root.add(asset);
    let index = BuildIndex::from_list(&root);

    std::fs::write(&index_path, index.to_bytes()?)?;
    let restored = BuildIndex::from_bytes(&std::fs::read(&index_path)?)?;

    assert_eq!(restored, index);
    Ok(())
}

#[test]
fn garbage_bytes_are_rejected() {
    assert!(BuildIndex::from_bytes(&[0xff, 0xff, 0xff]).is_err());
}
