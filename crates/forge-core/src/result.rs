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

//! Compilation results: collected diagnostics plus the produced build steps.

use crate::asset::{AssetItem, AssetRef};
use crate::build::ListBuildStep;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a [`LogMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Developer-level detail.
    Debug,
    /// Informational.
    Info,
    /// Something is off but compilation can proceed.
    Warning,
    /// The asset could not be compiled.
    Error,
    /// The asset could not be compiled and nothing depending on it can be.
    Fatal,
}

impl Severity {
    /// `true` for error-level severities.
    pub fn is_error(self) -> bool {
        self >= Severity::Error
    }

    fn log_level(self) -> log::Level {
        match self {
            Severity::Debug => log::Level::Debug,
            Severity::Info => log::Level::Info,
            Severity::Warning => log::Level::Warn,
            Severity::Error | Severity::Fatal => log::Level::Error,
        }
    }
}

/// A diagnostic recorded during compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMessage {
    /// Severity.
    pub severity: Severity,
    /// Message text.
    pub text: String,
    /// The asset the message is about, if any.
    pub asset: Option<AssetRef>,
}

impl fmt::Display for LogMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.asset {
            Some(asset) => write!(f, "[{:?}] {}: {}", self.severity, asset.location, self.text),
            None => write!(f, "[{:?}] {}", self.severity, self.text),
        }
    }
}

/// Accumulates diagnostics and build steps for one compilation.
///
/// A result is created fresh per compile call. Parents fold child results in
/// with [`merge`](Self::merge); nothing is ever removed, so
/// `has_errors` after a merge is the OR of both sides.
#[derive(Debug, Clone)]
pub struct AssetCompilerResult {
    messages: Vec<LogMessage>,
    /// The steps produced by this compilation, in order.
    pub build_steps: ListBuildStep,
}

impl Default for AssetCompilerResult {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetCompilerResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::with_title("build steps")
    }

    /// Creates an empty result whose step list carries `title`.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            build_steps: ListBuildStep::new(title),
        }
    }

    /// Records a message, mirroring it to the `log` facade.
    pub fn log(&mut self, severity: Severity, text: impl Into<String>, asset: Option<&AssetItem>) {
        let message = LogMessage {
            severity,
            text: text.into(),
            asset: asset.map(AssetItem::to_ref),
        };
        log::log!(target: "forge::compiler", severity.log_level(), "{message}");
        self.messages.push(message);
    }

    /// Records an informational message.
    pub fn info(&mut self, text: impl Into<String>, asset: Option<&AssetItem>) {
        self.log(Severity::Info, text, asset);
    }

    /// Records a warning.
    pub fn warning(&mut self, text: impl Into<String>, asset: Option<&AssetItem>) {
        self.log(Severity::Warning, text, asset);
    }

    /// Records an error.
    pub fn error(&mut self, text: impl Into<String>, asset: Option<&AssetItem>) {
        self.log(Severity::Error, text, asset);
    }

    /// `true` if at least one error-level message has been recorded, directly
    /// or through a merged child.
    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|m| m.severity.is_error())
    }

    /// All messages, in recording order.
    pub fn messages(&self) -> &[LogMessage] {
        &self.messages
    }

    /// Error-level messages.
    pub fn errors(&self) -> impl Iterator<Item = &LogMessage> {
        self.messages.iter().filter(|m| m.severity.is_error())
    }

    /// Warnings.
    pub fn warnings(&self) -> impl Iterator<Item = &LogMessage> {
        self.messages
            .iter()
            .filter(|m| m.severity == Severity::Warning)
    }

    /// Folds `child` into this result.
    ///
    /// The child's messages are appended unchanged (severity and asset
    /// annotation preserved, no re-logging) and its steps are appended as
    /// children of this result's step list, after the steps already there.
    pub fn merge(&mut self, mut child: AssetCompilerResult) {
        self.messages.append(&mut child.messages);
        self.build_steps.extend(child.build_steps.take_steps());
    }
}
