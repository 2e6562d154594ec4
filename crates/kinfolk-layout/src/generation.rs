//! Generation assignment.
//!
//! Depth-first walk from the primary member: parents sit one generation above (`-1`), children
//! one below (`+1`), spouses and siblings on the same level. The first generation a member is
//! reached with wins; later paths to an already-visited member (cycles, diamonds, contradictory
//! records) are ignored, so inconsistent data resolves by traversal order rather than by error.

use crate::index::RelationshipIndex;
use indexmap::IndexMap;
use kinfolk_core::Snapshot;
use rustc_hash::FxHashSet as HashSet;
use serde::Serialize;
use std::collections::BTreeMap;

/// Member id → generation, in the order members were first reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GenerationMap(IndexMap<String, i32>);

impl GenerationMap {
    pub fn get(&self, id: &str) -> Option<i32> {
        self.0.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.0.iter().map(|(id, &g)| (id.as_str(), g))
    }

    pub fn min(&self) -> Option<i32> {
        self.0.values().copied().min()
    }

    pub fn max(&self) -> Option<i32> {
        self.0.values().copied().max()
    }

    /// Members grouped by generation (ascending), each group in map order.
    pub fn levels(&self) -> BTreeMap<i32, Vec<&str>> {
        let mut out: BTreeMap<i32, Vec<&str>> = BTreeMap::new();
        for (id, g) in self.iter() {
            out.entry(g).or_default().push(id);
        }
        out
    }

    fn insert_if_absent(&mut self, id: &str, generation: i32) -> bool {
        if self.0.contains_key(id) {
            return false;
        }
        self.0.insert(id.to_string(), generation);
        true
    }
}

impl FromIterator<(String, i32)> for GenerationMap {
    fn from_iter<I: IntoIterator<Item = (String, i32)>>(iter: I) -> Self {
        let mut map = Self::default();
        for (id, g) in iter {
            map.insert_if_absent(&id, g);
        }
        map
    }
}

/// Assigns generations relative to `primary_id` (generation 0).
///
/// Members unreachable from the primary get generation 0. Relationship endpoints that are not
/// members of `snapshot` are never assigned. An unknown `primary_id` yields an empty map.
pub fn assign_generations(
    snapshot: &Snapshot,
    index: &RelationshipIndex,
    primary_id: &str,
) -> GenerationMap {
    let mut generations = GenerationMap::default();
    if !snapshot.contains(primary_id) {
        return generations;
    }

    let mut visited: HashSet<&str> = HashSet::default();
    walk(index, primary_id, &mut visited, &mut generations);

    let mut disconnected = 0usize;
    for m in snapshot.members() {
        if generations.insert_if_absent(&m.id, 0) {
            disconnected += 1;
        }
    }
    if disconnected > 0 {
        tracing::debug!(disconnected, "members unreachable from primary placed at generation 0");
    }
    generations
}

/// Iterative pre-order DFS. Neighbours are pushed in reverse so they pop in visiting order:
/// parents, children, spouses, siblings.
fn walk<'a>(
    index: &'a RelationshipIndex,
    start: &'a str,
    visited: &mut HashSet<&'a str>,
    out: &mut GenerationMap,
) {
    let mut stack: Vec<(&'a str, i32)> = vec![(start, 0)];
    let mut next: Vec<(&'a str, i32)> = Vec::new();

    while let Some((id, generation)) = stack.pop() {
        if !index.contains(id) || !visited.insert(id) {
            continue;
        }
        out.insert_if_absent(id, generation);

        next.clear();
        next.extend(index.parents(id).map(|p| (p, generation - 1)));
        next.extend(index.children(id).map(|c| (c, generation + 1)));
        next.extend(index.spouses(id).map(|s| (s, generation)));
        next.extend(index.siblings(id).map(|s| (s, generation)));
        stack.extend(
            next.iter()
                .rev()
                .filter(|(other, _)| !visited.contains(other))
                .copied(),
        );
    }
}
