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
use forge_assets::load_session;
use std::env;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

// Kept in its own test binary: it changes the process working directory.
#[test]
fn current_directory_finds_sibling_dependencies() -> Result<()> {
    let dir = tempdir()?;
    let root = dir.path();
    fs::create_dir_all(root.join("shared/assets"))?;
    fs::create_dir_all(root.join("game/assets"))?;
    fs::write(root.join("shared/Package.toml"), "name = \"shared\"\n")?;
    fs::write(
        root.join("shared/assets/stone.asset.toml"),
        "kind = \"texture\"\nsource = \"stone.png\"\n",
    )?;
    fs::write(
        root.join("game/Package.toml"),
        "name = \"game\"\ndependencies = [\"shared\"]\n",
    )?;
    fs::write(
        root.join("game/assets/table.asset.toml"),
        "kind = \"material\"\ntextures = { albedo = \"assets/stone\" }\n",
    )?;

    let previous = env::current_dir()?;
    env::set_current_dir(root.join("game"))?;
    let loaded = load_session(Path::new("."));
    env::set_current_dir(previous)?;

    let loaded = loaded?;
    let names: Vec<&str> = loaded
        .session
        .packages()
        .iter()
        .map(|package| package.name())
        .collect();
    assert_eq!(names, vec!["game", "shared"]);
    Ok(())
}
