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
use forge_assets::load_session;
use forge_compiler::PackageSessionAnalysis;
use forge_core::result::AssetCompilerResult;
use std::path::Path;

pub fn run(package: &Path) -> Result<()> {
    print_task_start("Checking Package", MAGNIFIER, CYAN);

    let loaded = load_session(package)
        .with_context(|| format!("Failed to load package at '{}'", package.display()))?;
    print_info(&format!(
        "Loaded {} package(s), {} asset(s)",
        loaded.session.packages().len(),
        loaded.session.all_assets().count()
    ));

    let mut result = AssetCompilerResult::new();
    let healthy = PackageSessionAnalysis::new(&loaded.session).run(&mut result);
    print_messages(result.messages());

    if !healthy {
        print_error("Package session has integrity errors.");
        anyhow::bail!("check failed for '{}'", package.display());
    }
    print_success("Package session is consistent.");
    Ok(())
}
