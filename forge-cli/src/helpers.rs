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

use forge_core::result::{LogMessage, Severity};

// ANSI color codes
pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const GREEN: &str = "\x1b[32m";
pub const RED: &str = "\x1b[31m";
pub const BLUE: &str = "\x1b[34m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const DIM: &str = "\x1b[2m";

// Visual symbols
pub const CHECK: &str = "✓";
pub const CROSS: &str = "✗";
pub const WARN: &str = "⚠";
pub const HAMMER: &str = "🔨";
pub const MAGNIFIER: &str = "🔍";

pub const BANNER: &str = concat!(
    "\x1b[1m",
    "\x1b[36m", // BOLD, CYAN
    "╔═══════════════════════════════════════════════════════════╗\n",
    "║                         ",
    "🔨",
    " FORGE                           ║\n",
    "║                  Asset Compilation Pipeline               ║\n",
    "╚═══════════════════════════════════════════════════════════╝",
    "\x1b[0m" // RESET
);

pub fn print_task_start(task_name: &str, emoji: &str, color: &str) {
    println!(
        "\n{}{}━━━ {} {} {}━━━{}",
        BOLD, color, emoji, task_name, emoji, RESET
    );
}

pub fn print_success(message: &str) {
    println!("{}{} {} {}{}", BOLD, GREEN, CHECK, message, RESET);
}

pub fn print_error(message: &str) {
    println!("{}{} {} {}{}", BOLD, RED, CROSS, message, RESET);
}

pub fn print_info(message: &str) {
    println!("{}💡 Info:{} {}", BOLD, RESET, message);
}

/// Prints one compiler diagnostic; debug messages are dimmed.
pub fn print_message(message: &LogMessage) {
    let (color, symbol) = match message.severity {
        Severity::Debug => (DIM, "·"),
        Severity::Info => (BLUE, "i"),
        Severity::Warning => (YELLOW, WARN),
        Severity::Error | Severity::Fatal => (RED, CROSS),
    };
    println!("  {}{}{} {}", color, symbol, RESET, message);
}

/// Prints every diagnostic, then an error/warning tally.
pub fn print_messages(messages: &[LogMessage]) {
    for message in messages {
        print_message(message);
    }
    let errors = messages.iter().filter(|m| m.severity.is_error()).count();
    let warnings = messages
        .iter()
        .filter(|m| m.severity == Severity::Warning)
        .count();
    println!(
        "{}{} error(s), {} warning(s){}",
        BOLD, errors, warnings, RESET
    );
}
