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

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Namespace used to derive deterministic identifiers from names.
const FORGE_NAMESPACE: Uuid = Uuid::from_bytes([
    0x6b, 0x68, 0x6f, 0x72, 0x61, 0x2d, 0x46, 0x6f, 0x82, 0x67, 0x65, 0x2d, 0x61, 0x73, 0x73, 0x74,
]);

/// A globally unique, persistent identifier for a logical asset.
///
/// The id is the asset's identity: it never changes when the asset is moved,
/// renamed or edited. The compiler tracks visited assets by this id, never by
/// reference or location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId(Uuid);

impl AssetId {
    /// Creates a new, random (version 4) `AssetId`.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a deterministic (version 5) `AssetId` from a name, typically a
    /// source path. The same name always yields the same id.
    pub fn new_v5(name: &str) -> Self {
        Self(Uuid::new_v5(&FORGE_NAMESPACE, name.as_bytes()))
    }

    /// Wraps an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AssetId {
    /// Creates a new, random (version 4) `AssetId`.
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a string is not a valid asset id.
#[derive(Debug, thiserror::Error)]
#[error("invalid asset id '{input}': {source}")]
pub struct ParseIdError {
    input: String,
    #[source]
    source: uuid::Error,
}

impl FromStr for AssetId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|source| ParseIdError {
                input: s.to_string(),
                source,
            })
    }
}

pub(crate) fn name_uuid(name: &str) -> Uuid {
    Uuid::new_v5(&FORGE_NAMESPACE, name.as_bytes())
}
