//! Memoization of the most recent layout.
//!
//! The entry keeps copies of every input of [`layout_tree`]: the snapshot and all of
//! [`LayoutOptions`]. A hit requires both to compare equal to the cached ones; a content hash of
//! each is checked first so most misses skip the full comparison. Any change to either input is
//! a miss and replaces the cached entry.

use crate::model::TreeLayout;
use crate::pipeline::{LayoutOptions, layout_tree};
use kinfolk_core::Snapshot;
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Fingerprint {
    snapshot: u64,
    options: u64,
}

impl Fingerprint {
    fn new(snapshot: &Snapshot, options: &LayoutOptions) -> Self {
        Self {
            snapshot: snapshot.fingerprint(),
            options: options_fingerprint(options),
        }
    }
}

fn options_fingerprint(options: &LayoutOptions) -> u64 {
    let c = &options.config;
    let mut h = FxHasher::default();
    c.levels_up.hash(&mut h);
    c.levels_down.hash(&mut h);
    c.include_sibling_edges.hash(&mut h);
    c.orientation.hash(&mut h);
    for v in [
        c.spouse_offset,
        c.vertical_spacing,
        c.horizontal_spacing,
        c.node_size.width,
        c.node_size.height,
        c.large_node_size.width,
        c.large_node_size.height,
    ] {
        v.to_bits().hash(&mut h);
    }
    options.expansion.hash(&mut h);
    options.display.hash(&mut h);
    options.today.hash(&mut h);
    h.finish()
}

/// The inputs a layout was computed from. The fingerprint only short-circuits misses; a hit
/// also requires both inputs to compare equal.
#[derive(Debug)]
struct CacheEntry {
    fingerprint: Fingerprint,
    snapshot: Snapshot,
    options: LayoutOptions,
    layout: Arc<TreeLayout>,
}

impl CacheEntry {
    fn matches(
        &self,
        fingerprint: Fingerprint,
        snapshot: &Snapshot,
        options: &LayoutOptions,
    ) -> bool {
        self.fingerprint == fingerprint
            && self.options == *options
            && self.snapshot == *snapshot
    }
}

#[derive(Debug, Default)]
pub struct LayoutCache {
    entry: Option<CacheEntry>,
    hits: u64,
    misses: u64,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached layout for these inputs, computing it on a miss.
    pub fn get_or_compute(
        &mut self,
        snapshot: &Snapshot,
        options: &LayoutOptions,
    ) -> Arc<TreeLayout> {
        let fingerprint = Fingerprint::new(snapshot, options);
        if let Some(entry) = &self.entry {
            if entry.matches(fingerprint, snapshot, options) {
                self.hits += 1;
                tracing::trace!(hits = self.hits, "layout cache hit");
                return Arc::clone(&entry.layout);
            }
            if entry.fingerprint == fingerprint {
                tracing::debug!("layout cache fingerprint collision");
            }
        }

        self.misses += 1;
        tracing::debug!(misses = self.misses, "layout cache miss");
        let layout = Arc::new(layout_tree(snapshot, options));
        self.entry = Some(CacheEntry {
            fingerprint,
            snapshot: snapshot.clone(),
            options: options.clone(),
            layout: Arc::clone(&layout),
        });
        layout
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn is_cached(&self) -> bool {
        self.entry.is_some()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinfolk_core::{LayoutConfig, Member};

    #[test]
    fn equal_fingerprint_with_different_inputs_is_a_miss() {
        let cached = Snapshot::new(vec![Member::new("a", "A").primary()]);
        let asked = Snapshot::new(vec![Member::new("b", "B").primary()]);
        let options = LayoutOptions::new(LayoutConfig::default());

        let mut cache = LayoutCache::new();
        cache.entry = Some(CacheEntry {
            fingerprint: Fingerprint::new(&asked, &options),
            snapshot: cached.clone(),
            options: options.clone(),
            layout: Arc::new(layout_tree(&cached, &options)),
        });

        let layout = cache.get_or_compute(&asked, &options);
        assert_eq!((cache.hits(), cache.misses()), (0, 1));
        assert!(layout.node("b").is_some());
        assert!(layout.node("a").is_none());
    }
}
