//! Immutable member snapshots.
//!
//! The layout engine works on members whose relationship records are already joined into
//! `relationships_from`/`relationships_to`. Snapshots accept either that shape or a flat
//! `relationships` list, which is joined here.

use crate::model::{Member, Relationship};
use crate::{Error, Result};
use rustc_hash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    members: Vec<Member>,
    #[serde(skip)]
    by_id: HashMap<String, usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotDoc {
    members: Vec<Member>,
    #[serde(default)]
    relationships: Option<Vec<Relationship>>,
}

impl Snapshot {
    /// Wraps members whose relationship arrays are already joined.
    ///
    /// Duplicate ids keep the first occurrence.
    pub fn new(members: Vec<Member>) -> Self {
        let mut by_id: HashMap<String, usize> = HashMap::default();
        let mut kept: Vec<Member> = Vec::with_capacity(members.len());
        for m in members {
            if by_id.contains_key(&m.id) {
                tracing::debug!(member = %m.id, "dropping duplicate member id");
                continue;
            }
            by_id.insert(m.id.clone(), kept.len());
            kept.push(m);
        }
        Self {
            members: kept,
            by_id,
        }
    }

    /// Joins flat relationship records into each member's `relationships_from` /
    /// `relationships_to`. Existing joined arrays are replaced; records referencing unknown
    /// members are dropped.
    pub fn from_records(members: Vec<Member>, relationships: &[Relationship]) -> Self {
        let mut snapshot = Self::new(members.iter().map(Member::detached).collect());
        let mut dropped = 0usize;
        for rel in relationships {
            let (Some(&i1), Some(&i2)) = (
                snapshot.by_id.get(&rel.member_id1),
                snapshot.by_id.get(&rel.member_id2),
            ) else {
                dropped += 1;
                continue;
            };
            snapshot.members[i1].relationships_from.push(rel.clone());
            snapshot.members[i2].relationships_to.push(rel.clone());
        }
        if dropped > 0 {
            tracing::debug!(dropped, "dropped relationships referencing unknown members");
        }
        snapshot
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Accepts `{ "members": [...] }`, `{ "members": [...], "relationships": [...] }` or a bare
    /// member array.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(_) => {
                let members: Vec<Member> = serde_json::from_value(value)?;
                Ok(Self::new(members))
            }
            Value::Object(_) => {
                let doc: SnapshotDoc = serde_json::from_value(value)?;
                Ok(match doc.relationships {
                    Some(rels) => Self::from_records(doc.members, &rels),
                    None => Self::new(doc.members),
                })
            }
            other => Err(Error::InvalidSnapshot {
                message: format!("expected an object or array, found {}", json_kind(&other)),
            }),
        }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member(&self, id: &str) -> Option<&Member> {
        self.by_id.get(id).map(|&i| &self.members[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// The first member flagged primary.
    pub fn primary(&self) -> Option<&Member> {
        self.members.iter().find(|m| m.is_primary)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Stable content hash of the snapshot, used as a memoization key.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = rustc_hash::FxHasher::default();
        self.members.hash(&mut hasher);
        hasher.finish()
    }
}

impl From<Vec<Member>> for Snapshot {
    fn from(members: Vec<Member>) -> Self {
        Self::new(members)
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
