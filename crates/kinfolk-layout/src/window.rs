//! Visibility window over generations.
//!
//! By default only `levels_up` generations of ancestors and `levels_down` generations of
//! descendants around the primary are rendered. Each direction can be expanded independently;
//! hidden counts are in generation levels, not members.

use crate::generation::GenerationMap;
use indexmap::IndexSet;
use kinfolk_core::Expansion;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityWindow {
    /// Visible member ids in generation-map order.
    pub visible: IndexSet<String>,
    /// Inclusive visible generation range, `None` when nothing is visible.
    pub range: Option<(i32, i32)>,
    pub hidden_above: u32,
    pub hidden_below: u32,
}

impl VisibilityWindow {
    pub fn contains(&self, id: &str) -> bool {
        self.visible.contains(id)
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn includes_generation(&self, generation: i32) -> bool {
        self.range
            .is_some_and(|(lo, hi)| (lo..=hi).contains(&generation))
    }
}

/// Clips `generations` (primary at 0) to the visible range.
pub fn window(
    generations: &GenerationMap,
    expansion: Expansion,
    levels_up: u32,
    levels_down: u32,
) -> VisibilityWindow {
    let (Some(min_gen), Some(max_gen)) = (generations.min(), generations.max()) else {
        return VisibilityWindow::default();
    };

    let up = i32::try_from(levels_up).unwrap_or(i32::MAX);
    let down = i32::try_from(levels_down).unwrap_or(i32::MAX);

    let lo = if expansion.up {
        min_gen
    } else {
        min_gen.max(up.saturating_neg())
    };
    let hi = if expansion.down {
        max_gen
    } else {
        max_gen.min(down)
    };

    let hidden_above = if expansion.up {
        0
    } else {
        min_gen.min(0).unsigned_abs().saturating_sub(levels_up)
    };
    let hidden_below = if expansion.down {
        0
    } else {
        u32::try_from(max_gen.max(0))
            .unwrap_or(0)
            .saturating_sub(levels_down)
    };

    let visible: IndexSet<String> = generations
        .iter()
        .filter(|(_, g)| (lo..=hi).contains(g))
        .map(|(id, _)| id.to_string())
        .collect();

    tracing::trace!(
        lo,
        hi,
        hidden_above,
        hidden_below,
        visible = visible.len(),
        "visibility window"
    );

    VisibilityWindow {
        range: (!visible.is_empty()).then_some((lo, hi)),
        visible,
        hidden_above,
        hidden_below,
    }
}
