use kinfolk_layout::core::{
    Expansion, LayoutConfig, Member, Relationship, RelationshipType, Snapshot,
};
use kinfolk_layout::list_view;

fn parent(p: &str, c: &str) -> Relationship {
    Relationship::new(p, c, RelationshipType::Parent)
}

fn family() -> Snapshot {
    let ids = ["p", "a1", "a2", "a3", "a4", "a5", "b1", "b2", "k"];
    let members = ids
        .iter()
        .map(|id| {
            let m = Member::new(*id, id.to_uppercase());
            if *id == "p" { m.primary() } else { m }
        })
        .collect();
    Snapshot::from_records(
        members,
        &[
            parent("a1", "p"),
            parent("a2", "a1"),
            parent("a3", "a2"),
            parent("a4", "a3"),
            parent("a5", "a4"),
            Relationship::new("p", "b1", RelationshipType::Sibling),
            Relationship::new("b2", "p", RelationshipType::Sibling),
            parent("p", "k"),
        ],
    )
}

#[test]
fn groups_visible_generations_oldest_first() {
    let view = list_view(&family(), Expansion::collapsed(), &LayoutConfig::default());

    let levels: Vec<i32> = view.generations.iter().map(|g| g.level).collect();
    assert_eq!(levels, [-3, -2, -1, 0, 1]);
    let labels: Vec<&str> = view.generations.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(
        labels,
        [
            "Great-Grandparents",
            "Grandparents",
            "Parents",
            "Your Generation",
            "Children"
        ]
    );
    assert_eq!(view.hidden_above, 2);
    assert_eq!(view.hidden_below, 0);

    let own = view
        .generations
        .iter()
        .find(|g| g.is_primary_generation)
        .unwrap();
    assert_eq!(own.member_ids, ["p", "b1", "b2"]);
}

#[test]
fn expanding_up_reveals_all_ancestors() {
    let view = list_view(
        &family(),
        Expansion { up: true, down: false },
        &LayoutConfig::default(),
    );
    assert_eq!(view.generations.first().map(|g| g.level), Some(-5));
    assert_eq!(
        view.generations.first().map(|g| g.label.as_str()),
        Some("Great-Great-Great-Grandparents")
    );
    assert_eq!(view.hidden_above, 0);
}

#[test]
fn counts_sibling_records_in_both_directions() {
    let view = list_view(&family(), Expansion::all(), &LayoutConfig::default());
    assert_eq!(view.sibling_count, 2);
}
