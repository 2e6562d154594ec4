//! Subtree placement.
//!
//! Y is fixed by the row a member's generation occupies. X comes from a post-order walk from the
//! oldest visible generation: children are placed first, a parent is centered over the span of
//! its placed children, and members without placed children take the next slot of a single
//! left-to-right cursor, so leaves never overlap. Spouses not yet placed sit to the right of
//! their partner at `spouse_offset` steps. A centered parent that would land within
//! `horizontal_spacing` of a member already in its row (two parents of the same children with no
//! spouse record between them) moves past the row's rightmost member instead.
//!
//! Members the walk never reaches (fragments disconnected from the oldest row, or whose parents
//! fall outside the window) are placed afterwards, oldest generation first, by the same
//! procedure.

use crate::generation::GenerationMap;
use crate::index::RelationshipIndex;
use crate::model::Point;
use crate::window::VisibilityWindow;
use indexmap::IndexMap;
use kinfolk_core::{LayoutConfig, Orientation};
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

/// One rendered generation: its level and members in generation-map order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRow<'a> {
    pub generation: i32,
    pub members: Vec<&'a str>,
}

/// Rows for the members accepted by `include`, in render order: oldest first for `TB`, youngest
/// first for `BT`.
pub fn generation_rows<'a>(
    generations: &'a GenerationMap,
    include: impl Fn(&str) -> bool,
    orientation: Orientation,
) -> Vec<GenerationRow<'a>> {
    let mut rows: Vec<GenerationRow<'a>> = generations
        .levels()
        .into_iter()
        .map(|(generation, members)| GenerationRow {
            generation,
            members: members.into_iter().filter(|&id| include(id)).collect(),
        })
        .filter(|row| !row.members.is_empty())
        .collect();
    if orientation == Orientation::BT {
        rows.reverse();
    }
    rows
}

/// Positions every member of `window`. Empty window → empty map.
pub fn place_members(
    generations: &GenerationMap,
    window: &VisibilityWindow,
    index: &RelationshipIndex,
    config: &LayoutConfig,
) -> IndexMap<String, Point> {
    let rows = generation_rows(generations, |id| window.contains(id), config.orientation);
    if rows.is_empty() {
        return IndexMap::new();
    }

    let mut placer = Placer::new(&rows, index, config);

    // Oldest generation is the first row for TB and the last for BT.
    let mut by_age: Vec<&GenerationRow<'_>> = rows.iter().collect();
    by_age.sort_by_key(|row| row.generation);

    for &id in &by_age[0].members {
        placer.place_subtree(id);
    }
    let reached = placer.positions.len();

    for row in &by_age {
        for &id in &row.members {
            placer.place_subtree(id);
        }
    }
    if placer.positions.len() > reached {
        tracing::debug!(
            unreached = placer.positions.len() - reached,
            "placed members outside the root subtrees"
        );
    }

    // Emit in row order so callers get a stable, render-ordered map.
    let mut out: IndexMap<String, Point> = IndexMap::with_capacity(placer.positions.len());
    for row in &rows {
        for &id in &row.members {
            if let Some(p) = placer.positions.get(id) {
                out.insert(id.to_string(), *p);
            }
        }
    }
    out
}

enum Frame<'a> {
    Enter(&'a str),
    Exit(&'a str),
}

struct Placer<'a> {
    index: &'a RelationshipIndex,
    config: &'a LayoutConfig,
    generation_of: HashMap<&'a str, i32>,
    row_y: HashMap<i32, f64>,
    positions: HashMap<&'a str, Point>,
    occupied: HashMap<i32, Vec<f64>>,
    cursor: f64,
}

impl<'a> Placer<'a> {
    fn new(
        rows: &[GenerationRow<'a>],
        index: &'a RelationshipIndex,
        config: &'a LayoutConfig,
    ) -> Self {
        let mut generation_of: HashMap<&'a str, i32> = HashMap::default();
        let mut row_y: HashMap<i32, f64> = HashMap::default();
        for (i, row) in rows.iter().enumerate() {
            row_y.insert(row.generation, i as f64 * config.vertical_spacing);
            for &id in &row.members {
                generation_of.insert(id, row.generation);
            }
        }
        Self {
            index,
            config,
            generation_of,
            row_y,
            positions: HashMap::default(),
            occupied: HashMap::default(),
            cursor: 0.0,
        }
    }

    fn is_visible(&self, id: &str) -> bool {
        self.generation_of.contains_key(id)
    }

    fn y_of(&self, id: &str) -> f64 {
        self.generation_of
            .get(id)
            .and_then(|g| self.row_y.get(g))
            .copied()
            .unwrap_or(0.0)
    }

    fn insert(&mut self, id: &'a str, point: Point) {
        self.positions.insert(id, point);
        if let Some(&g) = self.generation_of.get(id) {
            self.occupied.entry(g).or_default().push(point.x);
        }
    }

    /// `x` if the row has room there, else the first free column right of the row.
    fn free_column(&self, id: &str, x: f64) -> f64 {
        let Some(row) = self.generation_of.get(id).and_then(|g| self.occupied.get(g)) else {
            return x;
        };
        let gap = self.config.horizontal_spacing;
        if row.iter().all(|&px| (px - x).abs() >= gap) {
            return x;
        }
        let rightmost = row.iter().copied().fold(x, f64::max);
        rightmost + gap
    }

    fn next_slot(&mut self) -> f64 {
        let x = self.cursor;
        self.cursor += self.config.horizontal_spacing;
        x
    }

    /// Post-order placement rooted at `root`, with an explicit frame stack. `on_path` guards
    /// against parent/child cycles in inconsistent data.
    fn place_subtree(&mut self, root: &'a str) {
        let mut stack: Vec<Frame<'a>> = vec![Frame::Enter(root)];
        let mut on_path: HashSet<&'a str> = HashSet::default();

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(id) => {
                    if self.positions.contains_key(id) || !on_path.insert(id) {
                        continue;
                    }
                    stack.push(Frame::Exit(id));
                    let children: Vec<&'a str> = self
                        .index
                        .children(id)
                        .filter(|c| {
                            self.is_visible(c)
                                && !self.positions.contains_key(c)
                                && !on_path.contains(c)
                        })
                        .collect();
                    stack.extend(children.into_iter().rev().map(Frame::Enter));
                }
                Frame::Exit(id) => {
                    on_path.remove(id);
                    self.place_member(id);
                }
            }
        }
    }

    fn place_member(&mut self, id: &'a str) {
        if self.positions.contains_key(id) {
            return;
        }

        let mut span: Option<(f64, f64)> = None;
        for child in self.index.children(id) {
            if let Some(p) = self.positions.get(child) {
                span = Some(match span {
                    Some((lo, hi)) => (lo.min(p.x), hi.max(p.x)),
                    None => (p.x, p.x),
                });
            }
        }
        let x = match span {
            Some((lo, hi)) => {
                let centered = (lo + hi) / 2.0;
                let x = self.free_column(id, centered);
                if x != centered {
                    tracing::trace!(
                        member = id,
                        centered,
                        x,
                        "moved parent off an occupied column"
                    );
                    self.cursor = self.cursor.max(x + self.config.horizontal_spacing);
                }
                x
            }
            None => self.next_slot(),
        };
        let y = self.y_of(id);
        self.insert(id, Point { x, y });

        let spouses: Vec<&'a str> = self
            .index
            .spouses(id)
            .filter(|s| self.is_visible(s) && !self.positions.contains_key(s))
            .collect();
        let mut rightmost = x;
        for (k, spouse) in spouses.into_iter().enumerate() {
            let sx = x + (k + 1) as f64 * self.config.spouse_offset;
            let sy = self.y_of(spouse);
            self.insert(spouse, Point { x: sx, y: sy });
            rightmost = sx;
        }
        if rightmost > x {
            self.cursor = self
                .cursor
                .max(rightmost + self.config.horizontal_spacing);
        }
    }
}
