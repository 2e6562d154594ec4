//! Relationship index.
//!
//! Relationship records reach the engine joined into each member's `relationships_from` and
//! `relationships_to` arrays, so the meaning of a PARENT record depends on which array it came
//! from. The index resolves that once into [`Kin`] records describing the member relative to
//! the other endpoint; nothing downstream looks at join position again.

use kinfolk_core::{Member, Relationship, RelationshipType, Snapshot};
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum KinRole {
    /// The member is a parent of `other`.
    ParentOf,
    /// The member is a child of `other`.
    ChildOf,
    Spouse,
    Sibling,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kin {
    pub role: KinRole,
    pub other_id: String,
}

/// Tagged kin of one member, `relationships_from` records first, then `relationships_to`, each
/// in input order. Duplicates and self references are dropped.
pub fn member_kin(member: &Member) -> Vec<Kin> {
    let mut out: Vec<Kin> = Vec::new();
    let mut seen: HashSet<(KinRole, &str)> = HashSet::default();

    let from = member.relationships_from.iter().map(|r| (r, true));
    let to = member.relationships_to.iter().map(|r| (r, false));
    for (rel, is_from) in from.chain(to) {
        let Some((role, other)) = resolve(rel, is_from) else {
            continue;
        };
        if other == member.id || !seen.insert((role, other)) {
            continue;
        }
        out.push(Kin {
            role,
            other_id: other.to_string(),
        });
    }
    out
}

fn resolve(rel: &Relationship, is_from: bool) -> Option<(KinRole, &str)> {
    let other = if is_from {
        rel.member_id2.as_str()
    } else {
        rel.member_id1.as_str()
    };
    if other.is_empty() {
        return None;
    }
    let role = match (rel.relationship_type, is_from) {
        (RelationshipType::Parent, true) | (RelationshipType::Child, false) => KinRole::ParentOf,
        (RelationshipType::Parent, false) | (RelationshipType::Child, true) => KinRole::ChildOf,
        (RelationshipType::Spouse, _) => KinRole::Spouse,
        (RelationshipType::Sibling, _) => KinRole::Sibling,
    };
    Some((role, other))
}

#[derive(Debug, Clone, Default)]
pub struct RelationshipIndex {
    kin: HashMap<String, Vec<Kin>>,
}

impl RelationshipIndex {
    pub fn new(snapshot: &Snapshot) -> Self {
        let kin = snapshot
            .members()
            .iter()
            .map(|m| (m.id.clone(), member_kin(m)))
            .collect();
        Self { kin }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.kin.contains_key(id)
    }

    pub fn kin(&self, id: &str) -> &[Kin] {
        self.kin.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn with_role<'a>(
        &'a self,
        id: &str,
        role: KinRole,
    ) -> impl Iterator<Item = &'a str> + use<'a> {
        self.kin(id)
            .iter()
            .filter(move |k| k.role == role)
            .map(|k| k.other_id.as_str())
    }

    pub fn parents<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.with_role(id, KinRole::ChildOf)
    }

    pub fn children<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.with_role(id, KinRole::ParentOf)
    }

    pub fn spouses<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.with_role(id, KinRole::Spouse)
    }

    pub fn siblings<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.with_role(id, KinRole::Sibling)
    }
}
