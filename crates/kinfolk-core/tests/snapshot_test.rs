use kinfolk_core::{Member, Relationship, RelationshipType, Snapshot};
use serde_json::json;

#[test]
fn from_records_joins_both_directions() {
    let members = vec![Member::new("p", "Primary").primary(), Member::new("m", "Mother")];
    let rels = vec![Relationship::new("m", "p", RelationshipType::Parent).with_id("r1")];

    let snap = Snapshot::from_records(members, &rels);
    let mother = snap.member("m").unwrap();
    let primary = snap.member("p").unwrap();
    assert_eq!(mother.relationships_from.len(), 1);
    assert!(mother.relationships_to.is_empty());
    assert_eq!(primary.relationships_to.len(), 1);
    assert_eq!(primary.relationships_to[0].id, "r1");
}

#[test]
fn from_records_drops_dangling_relationships_and_replaces_joined_arrays() {
    let mut stale = Member::new("p", "Primary").primary();
    stale
        .relationships_from
        .push(Relationship::new("p", "ghost", RelationshipType::Sibling));
    let rels = vec![Relationship::new("p", "nobody", RelationshipType::Spouse)];

    let snap = Snapshot::from_records(vec![stale], &rels);
    let primary = snap.member("p").unwrap();
    assert!(primary.relationships_from.is_empty());
    assert!(primary.relationships_to.is_empty());
}

#[test]
fn from_json_accepts_flat_and_joined_shapes() {
    let flat = json!({
        "members": [
            {"id": "a", "name": "A", "isPrimary": true},
            {"id": "b", "name": "B"}
        ],
        "relationships": [
            {"id": "r", "memberId1": "a", "memberId2": "b", "relationshipType": "SPOUSE"}
        ]
    });
    let snap = Snapshot::from_json(&flat.to_string()).unwrap();
    assert_eq!(snap.len(), 2);
    assert_eq!(snap.member("b").unwrap().relationships_to.len(), 1);
    assert_eq!(snap.primary().map(|m| m.id.as_str()), Some("a"));

    let bare = json!([{"id": "a", "name": "A"}]);
    let snap = Snapshot::from_json(&bare.to_string()).unwrap();
    assert_eq!(snap.len(), 1);
    assert!(snap.primary().is_none());
}

#[test]
fn from_json_rejects_scalars_and_bad_records() {
    assert!(matches!(
        Snapshot::from_json("42"),
        Err(kinfolk_core::Error::InvalidSnapshot { .. })
    ));
    assert!(matches!(
        Snapshot::from_json(r#"{"members": [{"id": "a"}]}"#),
        Err(kinfolk_core::Error::Json(_))
    ));
}

#[test]
fn duplicate_member_ids_keep_the_first() {
    let snap = Snapshot::new(vec![Member::new("a", "First"), Member::new("a", "Second")]);
    assert_eq!(snap.len(), 1);
    assert_eq!(snap.member("a").unwrap().name, "First");
}

#[test]
fn fingerprint_tracks_content() {
    let a = Snapshot::new(vec![Member::new("a", "A").primary()]);
    let b = Snapshot::new(vec![Member::new("a", "A").primary()]);
    let c = Snapshot::new(vec![Member::new("a", "Renamed").primary()]);
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_ne!(a.fingerprint(), c.fingerprint());
}
