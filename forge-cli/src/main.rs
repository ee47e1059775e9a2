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

// Command-line front end of the forge asset pipeline
// Run with: forge <command>

mod commands;
mod helpers;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::build::BuildArgs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "forge", version, about = "Compiles asset packages into build-step graphs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a package and write its build index.
    Build(BuildArgs),
    /// Check a package session for integrity problems without compiling.
    Check {
        /// Directory holding the package's Package.toml.
        package: PathBuf,
    },
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    println!("{}", helpers::BANNER);
    match cli.command {
        Commands::Build(args) => commands::build::run(args),
        Commands::Check { package } => commands::check::run(&package),
    }
}
