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
use std::fmt;

/// A content-addressable key derived from every input affecting a build
/// step's output.
///
/// Two steps with the same parameter hash are expected to produce identical
/// output, so an execution engine may run only one of them.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParameterHash([u8; 32]);

impl ParameterHash {
    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the lowercase hex encoding of the digest.
    pub fn to_hex(&self) -> String {
        blake3::Hash::from_bytes(self.0).to_hex().to_string()
    }
}

impl fmt::Display for ParameterHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ParameterHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form keeps graph dumps readable.
        write!(f, "ParameterHash({})", &self.to_hex()[..16])
    }
}

/// Incremental builder for a [`ParameterHash`].
///
/// Every write is length- or tag-prefixed so that adjacent fields cannot
/// collide (`"ab" + "c"` hashes differently from `"a" + "bc"`).
pub struct ParameterHasher {
    inner: blake3::Hasher,
}

impl ParameterHasher {
    /// Starts a hash for a step of the given kind.
    pub fn new(kind: &str) -> Self {
        let mut hasher = Self {
            inner: blake3::Hasher::new(),
        };
        hasher.write_str(kind);
        hasher
    }

    /// Feeds raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.inner.update(&(bytes.len() as u64).to_le_bytes());
        self.inner.update(bytes);
        self
    }

    /// Feeds a string.
    pub fn write_str(&mut self, value: &str) -> &mut Self {
        self.write_bytes(value.as_bytes())
    }

    /// Feeds an unsigned integer.
    pub fn write_u64(&mut self, value: u64) -> &mut Self {
        self.inner.update(&value.to_le_bytes());
        self
    }

    /// Feeds a float by its bit pattern.
    pub fn write_f32(&mut self, value: f32) -> &mut Self {
        self.inner.update(&value.to_bits().to_le_bytes());
        self
    }

    /// Feeds a boolean.
    pub fn write_bool(&mut self, value: bool) -> &mut Self {
        self.inner.update(&[value as u8]);
        self
    }

    /// Feeds a previously computed hash (e.g. a child step's).
    pub fn write_hash(&mut self, hash: &ParameterHash) -> &mut Self {
        self.inner.update(hash.as_bytes());
        self
    }

    /// Finishes the hash.
    pub fn finish(&self) -> ParameterHash {
        ParameterHash(*self.inner.finalize().as_bytes())
    }
}
