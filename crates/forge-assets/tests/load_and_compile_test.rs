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
use forge_assets::{load_session, register_builtin_compilers, LoadError, LoadedSession};
use forge_compiler::{CompilerRegistry, PackageAssetEnumerator, PackageCompiler};
use forge_core::asset::AssetId;
use forge_core::build::{BuildIndex, BuildStep};
use forge_core::context::{AssetCompilerContext, Platform, ThumbnailCompilationContext};
use forge_core::result::AssetCompilerResult;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::{tempdir, TempDir};

// --- Test Setup: two packages on disk, "game" depending on "shared" ---
fn write(root: &Path, relative: &str, content: &str) -> Result<()> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

fn workspace() -> Result<TempDir> {
    let dir = tempdir()?;
    let root = dir.path();

    write(root, "shared/Package.toml", "name = \"shared\"\nversion = \"2.0.0\"\n")?;
    write(
        root,
        "shared/assets/textures/stone.asset.toml",
        "kind = \"texture\"\nsource = \"stone.png\"\nformat = \"bc1\"\n",
    )?;
    write(root, "shared/assets/textures/stone.png", "stone pixels")?;

    write(
        root,
        "game/Package.toml",
        "name = \"game\"\nversion = \"1.0.0\"\ndependencies = [\"shared\"]\n",
    )?;
    write(
        root,
        "game/assets/textures/wood.asset.toml",
        "kind = \"texture\"\nsource = \"wood.png\"\nformat = \"bc7\"\n",
    )?;
    write(root, "game/assets/textures/wood.png", "wood pixels")?;
    write(
        root,
        "game/assets/materials/table.asset.toml",
        concat!(
            "kind = \"material\"\n",
            "textures = { albedo = \"assets/textures/wood\", detail = \"assets/textures/stone\" }\n",
            "parameters = { roughness = 0.6, metallic = 0 }\n",
        ),
    )?;
    write(
        root,
        "game/assets/readme.asset.toml",
        "kind = \"raw\"\nsource = \"readme.txt\"\n",
    )?;
    write(root, "game/assets/readme.txt", "hello")?;
    Ok(dir)
}

fn registry() -> Arc<CompilerRegistry> {
    let mut registry = CompilerRegistry::new();
    register_builtin_compilers(&mut registry);
    Arc::new(registry)
}

fn compile(loaded: LoadedSession, context: &AssetCompilerContext) -> Result<(AssetCompilerResult, Vec<String>)> {
    let compiler = PackageCompiler::new(
        PackageAssetEnumerator::new(Arc::new(loaded.session), loaded.root),
        registry(),
    );
    let events = compiler.subscribe();
    let result = compiler.prepare(context)?;
    let compiled = events
        .try_iter()
        .map(|event| event.item.location().to_string())
        .collect();
    Ok((result, compiled))
}

fn outputs(result: &AssetCompilerResult) -> Vec<String> {
    BuildIndex::from_list(&result.build_steps)
        .entries()
        .iter()
        .map(|entry| entry.output_location.clone())
        .collect()
}
// ---

#[test]
fn loads_package_and_its_dependencies() -> Result<()> {
    let dir = workspace()?;
    let loaded = load_session(&dir.path().join("game"))?;

    let names: Vec<&str> = loaded
        .session
        .packages()
        .iter()
        .map(|package| package.name())
        .collect();
    assert_eq!(names, vec!["game", "shared"]);

    let game = loaded.session.package(loaded.root).expect("root package");
    assert_eq!(game.version(), "1.0.0");
    let locations: Vec<&str> = game.assets().iter().map(|item| item.location()).collect();
    assert_eq!(
        locations,
        vec![
            "assets/materials/table",
            "assets/readme",
            "assets/textures/wood"
        ]
    );
    Ok(())
}

#[test]
fn derived_ids_are_stable_across_loads() -> Result<()> {
    let dir = workspace()?;
    let first = load_session(&dir.path().join("game"))?;
    let second = load_session(&dir.path().join("game"))?;

    let ids = |loaded: &LoadedSession| -> Vec<_> {
        loaded.session.all_assets().map(|item| item.id()).collect()
    };
    assert_eq!(ids(&first), ids(&second));
    Ok(())
}

#[test]
fn compiles_the_whole_closure_once() -> Result<()> {
    let dir = workspace()?;
    let loaded = load_session(&dir.path().join("game"))?;
    let (result, compiled) = compile(loaded, &AssetCompilerContext::new())?;

    assert!(!result.has_errors(), "{:?}", result.messages());
    assert_eq!(
        compiled,
        vec![
            "assets/textures/wood",
            "assets/textures/stone",
            "assets/materials/table",
            "assets/readme"
        ]
    );

    // Textures nest inside the material that pulled them in.
    assert_eq!(result.build_steps.len(), 2);
    let material = &result.build_steps.steps()[0];
    let nested: Vec<String> = material.children().iter().map(BuildStep::title).collect();
    assert_eq!(nested[..2], ["asset assets/textures/wood", "asset assets/textures/stone"]);

    assert_eq!(
        outputs(&result),
        vec![
            "assets/textures/wood",
            "assets/textures/stone",
            "assets/materials/table",
            "assets/readme"
        ]
    );
    Ok(())
}

#[test]
fn texture_hashes_depend_on_platform() -> Result<()> {
    let dir = workspace()?;
    let root = dir.path().join("game");

    let (windows, _) = compile(load_session(&root)?, &AssetCompilerContext::new())?;
    let (web, _) = compile(
        load_session(&root)?,
        &AssetCompilerContext::new().with_platform(Platform::Web),
    )?;

    let windows = BuildIndex::from_list(&windows.build_steps);
    let web = BuildIndex::from_list(&web.build_steps);
    let hash_of = |index: &BuildIndex, output: &str| {
        index
            .entries()
            .iter()
            .find(|entry| entry.output_location == output)
            .map(|entry| entry.hash)
    };

    assert_ne!(
        hash_of(&windows, "assets/textures/wood"),
        hash_of(&web, "assets/textures/wood")
    );
    assert_eq!(
        hash_of(&windows, "assets/readme"),
        hash_of(&web, "assets/readme")
    );
    Ok(())
}

#[test]
fn thumbnail_context_uses_the_thumbnail_compiler() -> Result<()> {
    let dir = workspace()?;
    let loaded = load_session(&dir.path().join("game"))?;
    let context = AssetCompilerContext::new().with_compilation_context::<ThumbnailCompilationContext>();
    let (result, _) = compile(loaded, &context)?;

    assert!(!result.has_errors());
    let outputs = outputs(&result);
    assert!(outputs.contains(&"assets/textures/wood.thumbnail".to_string()));
    // Raw assets fall back to the regular compiler.
    assert!(outputs.contains(&"assets/readme".to_string()));
    Ok(())
}

#[test]
fn missing_texture_source_blocks_the_material() -> Result<()> {
    let dir = workspace()?;
    fs::remove_file(dir.path().join("game/assets/textures/wood.png"))?;
    let loaded = load_session(&dir.path().join("game"))?;
    let (result, compiled) = compile(loaded, &AssetCompilerContext::new())?;

    assert!(result.has_errors());
    let errors: Vec<_> = result.errors().collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].text.contains("wood.png"));
    assert_eq!(compiled.len(), 4, "every asset still reaches a terminal state");

    let outputs = outputs(&result);
    assert!(!outputs.contains(&"assets/materials/table".to_string()));
    assert!(outputs.contains(&"assets/textures/stone".to_string()));
    assert!(outputs.contains(&"assets/readme".to_string()));
    Ok(())
}

#[test]
fn missing_dependency_package_fails_before_compiling() -> Result<()> {
    let dir = workspace()?;
    fs::remove_dir_all(dir.path().join("shared"))?;
    write(
        dir.path(),
        "game/assets/materials/table.asset.toml",
        "kind = \"material\"\n",
    )?;

    let loaded = load_session(&dir.path().join("game"))?;
    assert_eq!(loaded.session.packages().len(), 1);

    let (result, compiled) = compile(loaded, &AssetCompilerContext::new())?;
    assert!(result.has_errors());
    assert!(result.errors().any(|message| message.text.contains("shared")));
    assert!(result.build_steps.is_empty());
    assert!(compiled.is_empty());
    Ok(())
}

#[test]
fn unknown_texture_location_is_a_load_error() -> Result<()> {
    let dir = workspace()?;
    write(
        dir.path(),
        "game/assets/materials/table.asset.toml",
        "kind = \"material\"\ntextures = { albedo = \"assets/textures/oak\" }\n",
    )?;

    match load_session(&dir.path().join("game")) {
        Err(LoadError::UnresolvedReference {
            package,
            location,
            reference,
        }) => {
            assert_eq!(package, "game");
            assert_eq!(location, "assets/materials/table");
            assert_eq!(reference, "assets/textures/oak");
        }
        other => panic!("expected an unresolved reference, got {other:?}"),
    }
    Ok(())
}

fn texture_id(loaded: &LoadedSession, package: &str, location: &str) -> Option<AssetId> {
    loaded
        .session
        .packages()
        .iter()
        .find(|candidate| candidate.name() == package)?
        .assets()
        .iter()
        .find(|item| item.location() == location)
        .map(|item| item.id())
}

fn material_textures(loaded: &LoadedSession, package: &str, location: &str) -> Vec<AssetId> {
    loaded
        .session
        .packages()
        .iter()
        .filter(|candidate| candidate.name() == package)
        .flat_map(|candidate| candidate.assets().iter())
        .filter(|item| item.location() == location)
        .flat_map(|item| item.asset().references())
        .collect()
}

#[test]
fn locations_resolve_inside_the_referring_package_first() -> Result<()> {
    let dir = workspace()?;
    // Both packages now hold `assets/textures/wood`.
    write(
        dir.path(),
        "shared/assets/textures/wood.asset.toml",
        "kind = \"texture\"\nsource = \"stone.png\"\n",
    )?;
    write(
        dir.path(),
        "shared/assets/materials/floor.asset.toml",
        "kind = \"material\"\ntextures = { albedo = \"assets/textures/wood\" }\n",
    )?;

    let loaded = load_session(&dir.path().join("game"))?;
    let shared_wood = texture_id(&loaded, "shared", "assets/textures/wood").expect("shared wood");
    let game_wood = texture_id(&loaded, "game", "assets/textures/wood").expect("game wood");
    assert_ne!(shared_wood, game_wood);

    assert_eq!(
        material_textures(&loaded, "shared", "assets/materials/floor"),
        vec![shared_wood]
    );
    assert!(material_textures(&loaded, "game", "assets/materials/table").contains(&game_wood));
    Ok(())
}

#[test]
fn dependencies_cannot_see_their_dependents() -> Result<()> {
    let dir = workspace()?;
    write(
        dir.path(),
        "shared/assets/materials/floor.asset.toml",
        "kind = \"material\"\ntextures = { albedo = \"assets/textures/wood\" }\n",
    )?;

    match load_session(&dir.path().join("game")) {
        Err(LoadError::UnresolvedReference { package, location, .. }) => {
            assert_eq!(package, "shared");
            assert_eq!(location, "assets/materials/floor");
        }
        other => panic!("expected an unresolved reference, got {other:?}"),
    }
    Ok(())
}

#[test]
fn location_found_in_two_dependencies_is_ambiguous() -> Result<()> {
    let dir = workspace()?;
    write(dir.path(), "extra/Package.toml", "name = \"extra\"\n")?;
    write(
        dir.path(),
        "extra/assets/textures/stone.asset.toml",
        "kind = \"texture\"\nsource = \"stone.png\"\n",
    )?;
    write(
        dir.path(),
        "game/Package.toml",
        "name = \"game\"\ndependencies = [\"shared\", \"extra\"]\n",
    )?;

    assert!(matches!(
        load_session(&dir.path().join("game")),
        Err(LoadError::UnresolvedReference { ref reference, .. }) if reference == "assets/textures/stone"
    ));
    Ok(())
}

#[test]
fn directory_without_manifest_is_not_a_package() -> Result<()> {
    let dir = tempdir()?;
    assert!(matches!(
        load_session(dir.path()),
        Err(LoadError::NotAPackage(_))
    ));
    Ok(())
}
