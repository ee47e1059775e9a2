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

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A typed key into a [`PropertyBag`].
///
/// Two keys address the same slot only if both their name and their value
/// type match, so `PropertyKey::<u32>::new("lod")` and
/// `PropertyKey::<String>::new("lod")` never collide.
pub struct PropertyKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PropertyKey<T> {
    /// Creates a key.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// The key name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for PropertyKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PropertyKey<T> {}

impl<T> fmt::Debug for PropertyKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyKey<{}>({})", std::any::type_name::<T>(), self.name)
    }
}

type Slot = (&'static str, TypeId);

/// A typed property map, keyed by [`PropertyKey`].
///
/// Values are immutable once stored; setting a key replaces its value.
#[derive(Clone, Default)]
pub struct PropertyBag {
    values: HashMap<Slot, Arc<dyn Any + Send + Sync>>,
}

impl PropertyBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set<T: Send + Sync + 'static>(&mut self, key: PropertyKey<T>, value: T) {
        self.values
            .insert((key.name, TypeId::of::<T>()), Arc::new(value));
    }

    /// Returns a copy of the value stored under `key`.
    pub fn get<T: Clone + Send + Sync + 'static>(&self, key: PropertyKey<T>) -> Option<T> {
        self.values
            .get(&(key.name, TypeId::of::<T>()))
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    /// Returns `true` if a value is stored under `key`.
    pub fn contains<T: 'static>(&self, key: PropertyKey<T>) -> bool {
        self.values.contains_key(&(key.name, TypeId::of::<T>()))
    }

    /// Removes the value stored under `key`. Returns `true` if there was one.
    pub fn remove<T: 'static>(&mut self, key: PropertyKey<T>) -> bool {
        self.values.remove(&(key.name, TypeId::of::<T>())).is_some()
    }

    /// Number of stored properties.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` when the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for PropertyBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.values.keys().map(|(name, _)| *name).collect();
        names.sort_unstable();
        f.debug_struct("PropertyBag").field("keys", &names).finish()
    }
}
