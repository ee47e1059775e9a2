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

use crate::helpers::*;
use anyhow::{Context, Result};
use clap::Args;
use forge_assets::{load_session, register_builtin_compilers};
use forge_compiler::{CompilerRegistry, PackageAssetEnumerator, PackageCompiler};
use forge_core::build::BuildIndex;
use forge_core::context::{
    AssetCompilerContext, BuildConfiguration, Platform, PreviewCompilationContext,
    ThumbnailCompilationContext,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Directory holding the package's Package.toml.
    pub package: PathBuf,
    /// Target platform.
    #[arg(long, default_value_t = Platform::default())]
    pub platform: Platform,
    /// Build profile name.
    #[arg(long, default_value = "Default")]
    pub profile: String,
    /// Build configuration (debug, release, appstore).
    #[arg(long, default_value_t = BuildConfiguration::default())]
    pub configuration: BuildConfiguration,
    /// Compiler option override, e.g. `--option texture.max_size=512`. Repeatable.
    #[arg(long = "option", value_name = "KEY=VALUE", value_parser = parse_option)]
    pub options: Vec<(String, String)>,
    /// Compile for in-editor previews.
    #[arg(long, conflicts_with = "thumbnail")]
    pub preview: bool,
    /// Compile thumbnails.
    #[arg(long)]
    pub thumbnail: bool,
    /// Directory the build index is written to.
    #[arg(long, default_value = ".dist/build")]
    pub output: PathBuf,
}

fn parse_option(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

fn compiler_context(args: &BuildArgs) -> AssetCompilerContext {
    let mut context = AssetCompilerContext::new()
        .with_platform(args.platform)
        .with_profile(args.profile.clone())
        .with_build_configuration(args.configuration);
    if args.preview {
        context = context.with_compilation_context::<PreviewCompilationContext>();
    } else if args.thumbnail {
        context = context.with_compilation_context::<ThumbnailCompilationContext>();
    }
    for (key, value) in &args.options {
        context.set_option(key.as_str(), value.as_str());
    }
    context
}

pub fn run(args: BuildArgs) -> Result<()> {
    print_task_start("Compiling Package", HAMMER, BLUE);
    let start_time = Instant::now();

    let loaded = load_session(&args.package)
        .with_context(|| format!("Failed to load package at '{}'", args.package.display()))?;
    print_info(&format!(
        "Loaded {} package(s), {} asset(s) from '{}'",
        loaded.session.packages().len(),
        loaded.session.all_assets().count(),
        args.package.display()
    ));

    let context = compiler_context(&args).with_package(loaded.root);
    let mut registry = CompilerRegistry::new();
    register_builtin_compilers(&mut registry);

    let compiler = PackageCompiler::new(
        PackageAssetEnumerator::new(Arc::new(loaded.session), loaded.root),
        Arc::new(registry),
    );
    let events = compiler.subscribe();
    let result = compiler.prepare(&context)?;
    let compiled = events.try_iter().count();
    context.dispose();

    print_messages(result.messages());
    if result.has_errors() {
        print_error(&format!(
            "Compilation failed after {:.2}s",
            start_time.elapsed().as_secs_f64()
        ));
        anyhow::bail!("{} error(s) while compiling '{}'", result.errors().count(), args.package.display());
    }

    let index = BuildIndex::from_list(&result.build_steps);
    for (location, hashes) in index.output_conflicts() {
        log::warn!(
            "{} distinct commands write '{}': {:?}",
            hashes.len(),
            location,
            hashes
        );
    }
    write_index(&index, &args.output)?;

    print_success(&format!(
        "Compiled {} asset(s) into {} unique command(s) in {:.2}s",
        compiled,
        index.len(),
        start_time.elapsed().as_secs_f64()
    ));
    Ok(())
}

fn write_index(index: &BuildIndex, dest_dir: &Path) -> Result<()> {
    fs::create_dir_all(dest_dir)
        .with_context(|| format!("Failed to create output directory '{}'", dest_dir.display()))?;
    let index_path = dest_dir.join("index.bin");
    let encoded = index.to_bytes().context("Failed to serialize build index")?;
    fs::write(&index_path, &encoded)
        .with_context(|| format!("Failed to write index file to '{}'", index_path.display()))?;

    println!(
        "{}{} {} Wrote {} index entries to '{}' ({:.2} KB)",
        BOLD,
        GREEN,
        CHECK,
        index.len(),
        index_path.display(),
        encoded.len() as f64 / 1024.0
    );
    Ok(())
}
