//! Generation-grouped list of members, the non-graph rendering of a tree.

use crate::generation::assign_generations;
use crate::index::RelationshipIndex;
use crate::window::window;
use kinfolk_core::{Expansion, LayoutConfig, RelationshipType, Snapshot};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationGroup {
    pub level: i32,
    pub label: String,
    pub member_ids: Vec<String>,
    pub is_primary_generation: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    /// Visible generations, oldest first.
    pub generations: Vec<GenerationGroup>,
    pub hidden_above: u32,
    pub hidden_below: u32,
    /// SIBLING records on the primary member, counting both directions.
    pub sibling_count: usize,
}

/// Human label for a generation relative to the primary.
///
/// ```
/// use kinfolk_layout::generation_label;
/// assert_eq!(generation_label(0), "Your Generation");
/// assert_eq!(generation_label(-3), "Great-Grandparents");
/// assert_eq!(generation_label(4), "Great-Great-Grandchildren");
/// ```
pub fn generation_label(level: i32) -> String {
    let depth = level.unsigned_abs() as usize;
    let (one, two) = match level.signum() {
        0 => return "Your Generation".to_string(),
        -1 => ("Parents", "Grandparents"),
        _ => ("Children", "Grandchildren"),
    };
    match depth {
        1 => one.to_string(),
        n => format!("{}{two}", "Great-".repeat(n - 2)),
    }
}

pub fn list_view(snapshot: &Snapshot, expansion: Expansion, config: &LayoutConfig) -> ListView {
    let Some(primary) = snapshot.primary() else {
        tracing::debug!(members = snapshot.len(), "no primary member; empty list view");
        return ListView::default();
    };

    let index = RelationshipIndex::new(snapshot);
    let generations = assign_generations(snapshot, &index, &primary.id);
    let visible = window(&generations, expansion, config.levels_up, config.levels_down);

    let groups = generations
        .levels()
        .into_iter()
        .filter(|(level, _)| visible.includes_generation(*level))
        .map(|(level, ids)| GenerationGroup {
            level,
            label: generation_label(level),
            member_ids: ids.into_iter().map(str::to_string).collect(),
            is_primary_generation: level == 0,
        })
        .collect();

    let sibling_count = primary
        .relationships_from
        .iter()
        .chain(&primary.relationships_to)
        .filter(|r| r.relationship_type == RelationshipType::Sibling)
        .count();

    ListView {
        generations: groups,
        hidden_above: visible.hidden_above,
        hidden_below: visible.hidden_below,
        sibling_count,
    }
}
