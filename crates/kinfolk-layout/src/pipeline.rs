use crate::color::{BranchColors, node_color};
use crate::edges::build_edges;
use crate::generation::{GenerationMap, assign_generations};
use crate::index::RelationshipIndex;
use crate::model::{HiddenCounts, LayoutNode, MemberCard, NodeData, TreeLayout};
use crate::position::{generation_rows, place_members};
use crate::window::window;
use chrono::NaiveDate;
use kinfolk_core::dates::{age_on, birth_year, parse_dob};
use kinfolk_core::{DisplaySettings, Expansion, LayoutConfig, Member, Snapshot};

/// Inputs of one layout run besides the snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutOptions {
    pub config: LayoutConfig,
    pub expansion: Expansion,
    pub display: DisplaySettings,
    /// Reference date for ages. Without it nodes carry birth years only.
    pub today: Option<NaiveDate>,
}

impl LayoutOptions {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_expansion(mut self, expansion: Expansion) -> Self {
        self.expansion = expansion;
        self
    }

    pub fn with_display(mut self, display: DisplaySettings) -> Self {
        self.display = display;
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }
}

/// Generations of every member relative to the snapshot's primary; empty without one.
pub fn generations_of(snapshot: &Snapshot) -> GenerationMap {
    let Some(primary) = snapshot.primary() else {
        return GenerationMap::default();
    };
    let index = RelationshipIndex::new(snapshot);
    assign_generations(snapshot, &index, &primary.id)
}

/// Computes the render-ready layout of `snapshot`.
///
/// Never fails: a snapshot without members or without a primary yields an empty layout.
pub fn layout_tree(snapshot: &Snapshot, options: &LayoutOptions) -> TreeLayout {
    let Some(primary) = snapshot.primary() else {
        tracing::debug!(members = snapshot.len(), "no primary member; empty layout");
        return TreeLayout::empty();
    };
    let config = &options.config;

    let index = RelationshipIndex::new(snapshot);
    let generations = assign_generations(snapshot, &index, &primary.id);
    let visible = window(
        &generations,
        options.expansion,
        config.levels_up,
        config.levels_down,
    );

    // Colors come from every generation so they do not shift when the window grows.
    let all_rows = generation_rows(&generations, |_| true, config.orientation);
    let colors = BranchColors::from_rows(
        all_rows
            .iter()
            .map(|row| (row.generation, row.members.iter().copied())),
    );

    let positions = place_members(&generations, &visible, &index, config);

    let mut nodes: Vec<LayoutNode> = Vec::with_capacity(positions.len());
    for (id, position) in &positions {
        let (Some(member), Some(generation)) = (snapshot.member(id), generations.get(id)) else {
            continue;
        };
        let branch_color = colors
            .get(id)
            .unwrap_or_else(|| node_color(member, None));
        let size = if member.is_primary {
            config.large_node_size
        } else {
            config.node_size
        };
        nodes.push(LayoutNode {
            id: id.clone(),
            position: *position,
            width: size.width,
            height: size.height,
            data: NodeData {
                member: member_card(member, options),
                generation,
                branch_color,
                color: node_color(member, Some(branch_color)),
                is_large: member.is_primary,
            },
        });
    }

    let edges = build_edges(snapshot, &index, &visible, &colors, config);

    tracing::debug!(
        primary = %primary.id,
        nodes = nodes.len(),
        edges = edges.len(),
        hidden_up = visible.hidden_above,
        hidden_down = visible.hidden_below,
        "layout complete"
    );

    TreeLayout {
        nodes,
        edges,
        hidden_counts: HiddenCounts {
            up: visible.hidden_above,
            down: visible.hidden_below,
        },
    }
}

fn member_card(member: &Member, options: &LayoutOptions) -> MemberCard {
    let mut card = MemberCard::from_member(member);
    if options.display.show_dob {
        if let Some(dob) = member.dob.as_deref().and_then(parse_dob) {
            card.birth_year = Some(birth_year(dob));
            card.age = options.today.and_then(|today| age_on(dob, today));
        }
    }
    if options.display.show_location {
        card.location = member.location.clone();
    }
    card
}
