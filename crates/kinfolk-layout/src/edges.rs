//! Edge synthesis.
//!
//! Relationships are stored on both endpoints, so every logical edge is seen at least twice.
//! Parent edges are keyed by direction (`parent-<parent>-<child>`) and suppressed when the
//! reverse key was already emitted; spouse and sibling edges are keyed by the sorted pair.

use crate::color::{BranchColors, SIBLING_EDGE_COLOR, SPOUSE_EDGE_COLOR, gender_color};
use crate::index::{Kin, KinRole, RelationshipIndex};
use crate::model::{EdgeCurve, EdgeKind, EdgeMarker, EdgeStyle, LayoutEdge};
use crate::window::VisibilityWindow;
use kinfolk_core::{LayoutConfig, Snapshot};
use rustc_hash::FxHashSet as HashSet;

pub const SPOUSE_LABEL: &str = "❤️";
pub const ARROW_MARKER: &str = "arrowclosed";

const PARENT_STROKE_WIDTH: f64 = 3.0;
const PAIR_STROKE_WIDTH: f64 = 2.0;

fn pair_key(prefix: &str, a: &str, b: &str) -> (String, String, String) {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    (format!("{prefix}-{lo}-{hi}"), lo.to_string(), hi.to_string())
}

/// Per member, parent edges come first, then spouse, then sibling edges.
fn emission_rank(role: KinRole) -> u8 {
    match role {
        KinRole::ParentOf | KinRole::ChildOf => 0,
        KinRole::Spouse => 1,
        KinRole::Sibling => 2,
    }
}

/// Builds deduplicated edges between visible members, in snapshot member order.
pub fn build_edges(
    snapshot: &Snapshot,
    index: &RelationshipIndex,
    window: &VisibilityWindow,
    colors: &BranchColors,
    config: &LayoutConfig,
) -> Vec<LayoutEdge> {
    let mut edges: Vec<LayoutEdge> = Vec::new();
    let mut seen: HashSet<String> = HashSet::default();
    let mut skipped = 0usize;

    let parent_color = |id: &str| {
        colors
            .get(id)
            .unwrap_or_else(|| gender_color(snapshot.member(id).and_then(|m| m.gender)))
    };

    for member in snapshot.members() {
        let id = member.id.as_str();
        if !window.contains(id) {
            continue;
        }

        let mut ordered: Vec<&Kin> = index.kin(id).iter().collect();
        ordered.sort_by_key(|k| emission_rank(k.role));

        for kin in ordered {
            let other = kin.other_id.as_str();
            if !window.contains(other) {
                skipped += 1;
                continue;
            }

            match kin.role {
                KinRole::ParentOf | KinRole::ChildOf => {
                    let (parent, child) = if kin.role == KinRole::ParentOf {
                        (id, other)
                    } else {
                        (other, id)
                    };
                    let key = format!("parent-{parent}-{child}");
                    let reverse = format!("parent-{child}-{parent}");
                    if seen.contains(&key) || seen.contains(&reverse) {
                        continue;
                    }
                    let stroke = parent_color(parent);
                    seen.insert(key.clone());
                    edges.push(LayoutEdge {
                        id: key,
                        source: parent.to_string(),
                        target: child.to_string(),
                        kind: EdgeKind::Parent,
                        curve: EdgeCurve::Smoothstep,
                        style: EdgeStyle {
                            stroke,
                            stroke_width: PARENT_STROKE_WIDTH,
                            stroke_dasharray: None,
                        },
                        label: None,
                        marker_end: Some(EdgeMarker {
                            kind: ARROW_MARKER,
                            color: stroke,
                            width: 20.0,
                            height: 20.0,
                        }),
                    });
                }
                KinRole::Spouse => {
                    let (key, lo, hi) = pair_key("spouse", id, other);
                    if !seen.insert(key.clone()) {
                        continue;
                    }
                    edges.push(LayoutEdge {
                        id: key,
                        source: lo,
                        target: hi,
                        kind: EdgeKind::Spouse,
                        curve: EdgeCurve::Straight,
                        style: EdgeStyle {
                            stroke: SPOUSE_EDGE_COLOR,
                            stroke_width: PAIR_STROKE_WIDTH,
                            stroke_dasharray: Some("5,5"),
                        },
                        label: Some(SPOUSE_LABEL),
                        marker_end: None,
                    });
                }
                KinRole::Sibling => {
                    if !config.include_sibling_edges {
                        continue;
                    }
                    let (key, lo, hi) = pair_key("sibling", id, other);
                    if !seen.insert(key.clone()) {
                        continue;
                    }
                    edges.push(LayoutEdge {
                        id: key,
                        source: lo,
                        target: hi,
                        kind: EdgeKind::Sibling,
                        curve: EdgeCurve::Straight,
                        style: EdgeStyle {
                            stroke: SIBLING_EDGE_COLOR,
                            stroke_width: PAIR_STROKE_WIDTH,
                            stroke_dasharray: Some("3,3"),
                        },
                        label: None,
                        marker_end: None,
                    });
                }
            }
        }
    }

    tracing::debug!(
        edges = edges.len(),
        skipped_hidden = skipped,
        "synthesized edges"
    );
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorToken;
    use kinfolk_core::{Member, Relationship, RelationshipType};

    fn all_visible(snapshot: &Snapshot) -> VisibilityWindow {
        VisibilityWindow {
            visible: snapshot.members().iter().map(|m| m.id.clone()).collect(),
            range: Some((0, 0)),
            ..Default::default()
        }
    }

    #[test]
    fn double_recorded_parent_yields_one_edge() {
        let snap = Snapshot::from_records(
            vec![Member::new("m", "M"), Member::new("p", "P").primary()],
            &[
                Relationship::new("m", "p", RelationshipType::Parent).with_id("r1"),
                Relationship::new("p", "m", RelationshipType::Child).with_id("r2"),
            ],
        );
        let idx = RelationshipIndex::new(&snap);
        let edges = build_edges(
            &snap,
            &idx,
            &all_visible(&snap),
            &BranchColors::new(),
            &LayoutConfig::default(),
        );
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].id, "parent-m-p");
        assert_eq!(edges[0].source, "m");
        assert_eq!(edges[0].target, "p");
        // No branch color assigned: falls back to the parent's gender color.
        assert_eq!(edges[0].style.stroke, ColorToken::Violet);
    }

    #[test]
    fn hidden_endpoints_are_skipped() {
        let snap = Snapshot::from_records(
            vec![Member::new("a", "A").primary(), Member::new("b", "B")],
            &[Relationship::new("a", "b", RelationshipType::Spouse)],
        );
        let idx = RelationshipIndex::new(&snap);
        let window = VisibilityWindow {
            visible: ["a".to_string()].into_iter().collect(),
            range: Some((0, 0)),
            ..Default::default()
        };
        let edges = build_edges(
            &snap,
            &idx,
            &window,
            &BranchColors::new(),
            &LayoutConfig::default(),
        );
        assert!(edges.is_empty());
    }

    #[test]
    fn sibling_edges_follow_config() {
        let snap = Snapshot::from_records(
            vec![Member::new("b", "B"), Member::new("a", "A").primary()],
            &[Relationship::new("b", "a", RelationshipType::Sibling)],
        );
        let idx = RelationshipIndex::new(&snap);
        let window = all_visible(&snap);
        let colors = BranchColors::new();

        let edges = build_edges(&snap, &idx, &window, &colors, &LayoutConfig::default());
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].id, "sibling-a-b");
        assert_eq!(edges[0].style.stroke_dasharray, Some("3,3"));

        let edges = build_edges(&snap, &idx, &window, &colors, &LayoutConfig::interactive());
        assert!(edges.is_empty());
    }
}
