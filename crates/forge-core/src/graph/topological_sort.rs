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

//! Kahn's algorithm over a generic directed graph.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// A cycle was detected in the graph.
///
/// `unresolved` holds every node that could not be ordered, in input order:
/// the members of the cycle(s) plus any node that depends on one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleError<T> {
    /// Nodes left unordered.
    pub unresolved: Vec<T>,
}

/// Orders `nodes` so that every edge `(before, after)` is respected.
///
/// Among nodes that are ready at the same time, input order is kept, so the
/// result is deterministic. Edges that mention unknown nodes are ignored.
pub fn topological_sort<T>(
    nodes: impl IntoIterator<Item = T>,
    edges: impl IntoIterator<Item = (T, T)>,
) -> Result<Vec<T>, CycleError<T>>
where
    T: Copy + Eq + Hash,
{
    let node_list: Vec<T> = nodes.into_iter().collect();
    let mut adjacency: HashMap<T, Vec<T>> = HashMap::new();
    let mut in_degree: HashMap<T, usize> = node_list.iter().map(|n| (*n, 0)).collect();

    for (before, after) in edges {
        if !in_degree.contains_key(&before) {
            continue;
        }
        if let Some(degree) = in_degree.get_mut(&after) {
            *degree += 1;
            adjacency.entry(before).or_default().push(after);
        }
    }

    let mut queue: VecDeque<T> = node_list
        .iter()
        .copied()
        .filter(|n| in_degree.get(n).copied().unwrap_or(0) == 0)
        .collect();

    let mut sorted = Vec::with_capacity(node_list.len());
    while let Some(node) = queue.pop_front() {
        sorted.push(node);
        for next in adjacency.get(&node).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(next) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(*next);
                }
            }
        }
    }

    if sorted.len() == node_list.len() {
        Ok(sorted)
    } else {
        let unresolved = node_list
            .into_iter()
            .filter(|n| in_degree.get(n).copied().unwrap_or(0) > 0)
            .collect();
        Err(CycleError { unresolved })
    }
}
