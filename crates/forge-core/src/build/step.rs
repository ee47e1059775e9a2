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

use super::hash::{ParameterHash, ParameterHasher};
use crate::asset::{AssetItem, AssetRef};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// The execution state of a build step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResultStatus {
    /// The step has not been run yet.
    #[default]
    NotProcessed,
    /// The step ran and succeeded.
    Successful,
    /// The step ran and failed.
    Failed,
    /// The step was cancelled before completion.
    Cancelled,
    /// The step was skipped because a cached output with the same parameter
    /// hash already exists.
    NotTriggeredWasSuccessful,
    /// The step was skipped because one of its prerequisites failed.
    NotTriggeredPrerequisiteFailed,
}

impl ResultStatus {
    /// `true` for statuses that count as a produced output.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Successful | Self::NotTriggeredWasSuccessful)
    }

    /// `true` for statuses that count as a failure.
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Failed | Self::NotTriggeredPrerequisiteFailed)
    }
}

/// A unit of deferred content-production work.
///
/// Commands describe *what* has to run; executing them belongs to a separate
/// engine. Everything that affects the command's output must be fed to
/// [`hash_parameters`](BuildCommand::hash_parameters).
pub trait BuildCommand: Debug + Send + Sync {
    /// A stable identifier for the command kind (e.g. `"import-texture"`).
    fn kind(&self) -> &'static str;

    /// A short human-readable description.
    fn title(&self) -> String;

    /// Where the command writes its output.
    fn output_location(&self) -> &str;

    /// Feeds every output-affecting input into `hasher`.
    fn hash_parameters(&self, hasher: &mut ParameterHasher);
}

/// A leaf step wrapping a [`BuildCommand`].
#[derive(Debug, Clone)]
pub struct CommandBuildStep {
    command: Arc<dyn BuildCommand>,
    hash: ParameterHash,
    status: ResultStatus,
}

impl CommandBuildStep {
    /// Wraps `command` and computes its parameter hash.
    pub fn new(command: Arc<dyn BuildCommand>) -> Self {
        let mut hasher = ParameterHasher::new(command.kind());
        command.hash_parameters(&mut hasher);
        Self {
            hash: hasher.finish(),
            command,
            status: ResultStatus::NotProcessed,
        }
    }

    /// The wrapped command.
    pub fn command(&self) -> &dyn BuildCommand {
        self.command.as_ref()
    }

    /// The parameter hash computed at construction.
    pub fn parameter_hash(&self) -> ParameterHash {
        self.hash
    }

    /// The execution status.
    pub fn status(&self) -> ResultStatus {
        self.status
    }

    /// Records the execution status.
    pub fn set_status(&mut self, status: ResultStatus) {
        self.status = status;
    }
}

/// A composite step: an ordered sequence of child steps.
#[derive(Debug, Clone, Default)]
pub struct ListBuildStep {
    title: String,
    steps: Vec<BuildStep>,
}

impl ListBuildStep {
    /// Creates an empty list.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            steps: Vec::new(),
        }
    }

    /// The title of the list.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Appends a child step.
    pub fn add(&mut self, step: impl Into<BuildStep>) {
        self.steps.push(step.into());
    }

    /// Appends every step of `steps`, in order.
    pub fn extend(&mut self, steps: impl IntoIterator<Item = BuildStep>) {
        self.steps.extend(steps);
    }

    /// Removes and returns all children, leaving the list empty.
    pub fn take_steps(&mut self) -> Vec<BuildStep> {
        std::mem::take(&mut self.steps)
    }

    /// The child steps, in order.
    pub fn steps(&self) -> &[BuildStep] {
        &self.steps
    }

    /// Mutable access to the child steps.
    pub fn steps_mut(&mut self) -> &mut [BuildStep] {
        &mut self.steps
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// `true` when the list has no children.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Aggregate status of the children.
    ///
    /// Any failure makes the list fail; otherwise a cancellation cancels it;
    /// otherwise it is only successful once every child is.
    pub fn status(&self) -> ResultStatus {
        let statuses: Vec<ResultStatus> = self.steps.iter().map(BuildStep::status).collect();
        if statuses.iter().any(|s| s.is_failure()) {
            ResultStatus::Failed
        } else if statuses.contains(&ResultStatus::Cancelled) {
            ResultStatus::Cancelled
        } else if statuses.iter().all(|s| s.is_success()) {
            ResultStatus::Successful
        } else {
            ResultStatus::NotProcessed
        }
    }

    fn hash_with(&self, kind: &str, extra: impl FnOnce(&mut ParameterHasher)) -> ParameterHash {
        let mut hasher = ParameterHasher::new(kind);
        extra(&mut hasher);
        hasher.write_u64(self.steps.len() as u64);
        for step in &self.steps {
            hasher.write_hash(&step.parameter_hash());
        }
        hasher.finish()
    }
}

/// A [`ListBuildStep`] scoped to exactly one asset.
///
/// The graph produced for a package is a list of these per-asset subtrees.
/// Dependency subtrees pulled in while compiling an asset are nested inside
/// the requesting asset's step.
#[derive(Debug, Clone)]
pub struct AssetBuildStep {
    asset: AssetRef,
    list: ListBuildStep,
}

impl AssetBuildStep {
    /// Creates an empty step for `item`.
    pub fn new(item: &AssetItem) -> Self {
        Self {
            list: ListBuildStep::new(format!("asset {}", item.location())),
            asset: item.to_ref(),
        }
    }

    /// The asset this step builds.
    pub fn asset(&self) -> &AssetRef {
        &self.asset
    }

    /// Consumes the step, returning the inner list.
    pub fn into_list(self) -> ListBuildStep {
        self.list
    }
}

impl Deref for AssetBuildStep {
    type Target = ListBuildStep;

    fn deref(&self) -> &Self::Target {
        &self.list
    }
}

impl DerefMut for AssetBuildStep {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.list
    }
}

/// A node in the build graph.
#[derive(Debug, Clone)]
pub enum BuildStep {
    /// A single command.
    Command(CommandBuildStep),
    /// An ordered group of steps.
    List(ListBuildStep),
    /// An ordered group of steps producing one asset.
    Asset(AssetBuildStep),
}

impl BuildStep {
    /// Convenience constructor for a command step.
    pub fn command(command: impl BuildCommand + 'static) -> Self {
        Self::Command(CommandBuildStep::new(Arc::new(command)))
    }

    /// The content-addressable key of this step.
    ///
    /// Composite steps hash their kind, their asset (if scoped to one) and the
    /// ordered hashes of their children.
    pub fn parameter_hash(&self) -> ParameterHash {
        match self {
            Self::Command(step) => step.parameter_hash(),
            Self::List(list) => list.hash_with("list", |_| {}),
            Self::Asset(step) => step.list.hash_with("asset", |h| {
                h.write_str(&step.asset.id.to_string());
            }),
        }
    }

    /// The execution status (aggregated for composite steps).
    pub fn status(&self) -> ResultStatus {
        match self {
            Self::Command(step) => step.status(),
            Self::List(list) => list.status(),
            Self::Asset(step) => step.status(),
        }
    }

    /// Where this step writes its output.
    ///
    /// Commands report their own location; asset steps report the asset
    /// location; plain lists have none.
    pub fn output_location(&self) -> Option<&str> {
        match self {
            Self::Command(step) => Some(step.command().output_location()),
            Self::List(_) => None,
            Self::Asset(step) => Some(step.asset.location.as_str()),
        }
    }

    /// A short description of the step.
    pub fn title(&self) -> String {
        match self {
            Self::Command(step) => step.command().title(),
            Self::List(list) => list.title().to_string(),
            Self::Asset(step) => step.title().to_string(),
        }
    }

    /// Direct children (empty for commands).
    pub fn children(&self) -> &[BuildStep] {
        match self {
            Self::Command(_) => &[],
            Self::List(list) => list.steps(),
            Self::Asset(step) => step.steps(),
        }
    }

    /// Pre-order, depth-first traversal starting with `self`.
    pub fn walk(&self) -> impl Iterator<Item = &BuildStep> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children().iter().rev());
            Some(next)
        })
    }

    /// Returns the asset scope of this step, if it is an asset step.
    pub fn as_asset(&self) -> Option<&AssetBuildStep> {
        match self {
            Self::Asset(step) => Some(step),
            _ => None,
        }
    }
}

impl From<CommandBuildStep> for BuildStep {
    fn from(step: CommandBuildStep) -> Self {
        Self::Command(step)
    }
}

impl From<ListBuildStep> for BuildStep {
    fn from(list: ListBuildStep) -> Self {
        Self::List(list)
    }
}

impl From<AssetBuildStep> for BuildStep {
    fn from(step: AssetBuildStep) -> Self {
        Self::Asset(step)
    }
}
