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

use super::{BuildStep, ListBuildStep, ParameterHash};
use crate::asset::AssetRef;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Errors raised while encoding or decoding a [`BuildIndex`].
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The index could not be encoded.
    #[error("failed to encode build index: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    /// The bytes are not a valid encoded index.
    #[error("failed to decode build index: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}

/// One unique command of a build graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// The command's parameter hash, the cache key.
    pub hash: ParameterHash,
    /// The command kind.
    pub kind: String,
    /// The command title.
    pub title: String,
    /// Where the command writes its output.
    pub output_location: String,
    /// The innermost asset whose subtree first contained the command.
    pub asset: Option<AssetRef>,
    /// How many times the command appears in the graph.
    pub occurrences: u32,
}

/// A flattened, deduplicated view of every command in a build graph.
///
/// This is the hand-off artifact for an execution engine: one entry per
/// distinct parameter hash, in first-occurrence (pre-order) order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildIndex {
    entries: Vec<IndexEntry>,
}

impl BuildIndex {
    /// Indexes every command reachable from `root`.
    pub fn from_list(root: &ListBuildStep) -> Self {
        let mut builder = IndexBuilder::default();
        for step in root.steps() {
            builder.visit(step, None);
        }
        builder.finish()
    }

    /// Indexes every command reachable from `step`.
    pub fn from_step(step: &BuildStep) -> Self {
        let mut builder = IndexBuilder::default();
        builder.visit(step, None);
        builder.finish()
    }

    /// The unique entries, in first-occurrence order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Number of unique commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the graph contained no commands.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an entry by parameter hash.
    pub fn get(&self, hash: &ParameterHash) -> Option<&IndexEntry> {
        self.entries.iter().find(|entry| &entry.hash == hash)
    }

    /// Output locations written by more than one distinct command.
    ///
    /// A non-empty result means two different inputs race for the same
    /// output, which breaks location stability.
    pub fn output_conflicts(&self) -> BTreeMap<&str, Vec<ParameterHash>> {
        let mut by_location: BTreeMap<&str, Vec<ParameterHash>> = BTreeMap::new();
        for entry in &self.entries {
            by_location
                .entry(entry.output_location.as_str())
                .or_default()
                .push(entry.hash);
        }
        by_location.retain(|_, hashes| hashes.len() > 1);
        by_location
    }

    /// Encodes the index with bincode's standard configuration.
    pub fn to_bytes(&self) -> Result<Vec<u8>, IndexError> {
        let config = bincode::config::standard();
        Ok(bincode::serde::encode_to_vec(self, config)?)
    }

    /// Decodes an index previously produced by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IndexError> {
        let config = bincode::config::standard();
        let (index, _) = bincode::serde::decode_from_slice(bytes, config)?;
        Ok(index)
    }
}

#[derive(Default)]
struct IndexBuilder {
    entries: Vec<IndexEntry>,
    positions: HashMap<ParameterHash, usize>,
}

impl IndexBuilder {
    fn visit(&mut self, step: &BuildStep, asset: Option<&AssetRef>) {
        match step {
            BuildStep::Command(command) => {
                let hash = command.parameter_hash();
                if let Some(&position) = self.positions.get(&hash) {
                    self.entries[position].occurrences += 1;
                    return;
                }
                self.positions.insert(hash, self.entries.len());
                self.entries.push(IndexEntry {
                    hash,
                    kind: command.command().kind().to_string(),
                    title: command.command().title(),
                    output_location: command.command().output_location().to_string(),
                    asset: asset.cloned(),
                    occurrences: 1,
                });
            }
            BuildStep::List(list) => {
                for child in list.steps() {
                    self.visit(child, asset);
                }
            }
            BuildStep::Asset(scoped) => {
                for child in scoped.steps() {
                    self.visit(child, Some(scoped.asset()));
                }
            }
        }
    }

    fn finish(self) -> BuildIndex {
        BuildIndex {
            entries: self.entries,
        }
    }
}
