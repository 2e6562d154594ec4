//! In-memory family tree editor.
//!
//! Holds one user's members and relationship records and enforces the invariants the layout
//! engine relies on but never re-checks: at most one primary member, no self relationships and
//! at most one record per unordered member pair.

use crate::model::{Gender, Member, Relationship};
use crate::snapshot::Snapshot;
use crate::{Error, Result};
use indexmap::IndexMap;

/// Partial member update. `None` leaves a field untouched; `Some(None)` clears an optional one.
#[derive(Debug, Clone, Default)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub photo_url: Option<Option<String>>,
    pub dob: Option<Option<String>>,
    pub gender: Option<Option<Gender>>,
    pub bio: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub is_primary: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct FamilyTree {
    members: IndexMap<String, Member>,
    relationships: Vec<Relationship>,
    selected: Option<String>,
}

impl FamilyTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree from flat records, validating every insertion.
    pub fn from_records(
        members: impl IntoIterator<Item = Member>,
        relationships: impl IntoIterator<Item = Relationship>,
    ) -> Result<Self> {
        let mut tree = Self::new();
        for m in members {
            tree.add_member(m)?;
        }
        for r in relationships {
            tree.add_relationship(r)?;
        }
        Ok(tree)
    }

    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.get(id)
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn primary(&self) -> Option<&Member> {
        self.members.values().find(|m| m.is_primary)
    }

    pub fn add_member(&mut self, member: Member) -> Result<()> {
        if self.members.contains_key(&member.id) {
            return Err(Error::DuplicateMember { id: member.id });
        }
        if member.is_primary {
            self.ensure_no_primary_except(&member.id)?;
        }
        self.members.insert(member.id.clone(), member.detached());
        Ok(())
    }

    pub fn update_member(&mut self, id: &str, patch: MemberPatch) -> Result<&Member> {
        if !self.members.contains_key(id) {
            return Err(Error::UnknownMember { id: id.to_string() });
        }
        if patch.is_primary == Some(true) {
            self.ensure_no_primary_except(id)?;
        }
        let Some(m) = self.members.get_mut(id) else {
            return Err(Error::UnknownMember { id: id.to_string() });
        };
        if let Some(name) = patch.name {
            m.name = name;
        }
        if let Some(v) = patch.photo_url {
            m.photo_url = v;
        }
        if let Some(v) = patch.dob {
            m.dob = v;
        }
        if let Some(v) = patch.gender {
            m.gender = v;
        }
        if let Some(v) = patch.bio {
            m.bio = v;
        }
        if let Some(v) = patch.location {
            m.location = v;
        }
        if let Some(v) = patch.is_primary {
            m.is_primary = v;
        }
        Ok(m)
    }

    /// Removes a member together with every relationship touching it.
    pub fn remove_member(&mut self, id: &str) -> Result<Member> {
        let Some(member) = self.members.shift_remove(id) else {
            return Err(Error::UnknownMember { id: id.to_string() });
        };
        let before = self.relationships.len();
        self.relationships
            .retain(|r| r.member_id1 != id && r.member_id2 != id);
        tracing::debug!(
            member = id,
            cascaded = before - self.relationships.len(),
            "removed member"
        );
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        Ok(member)
    }

    /// Adds a relationship record, assigning a fresh id when the record has none.
    pub fn add_relationship(&mut self, mut relationship: Relationship) -> Result<&Relationship> {
        for id in [&relationship.member_id1, &relationship.member_id2] {
            if !self.members.contains_key(id) {
                return Err(Error::UnknownMember { id: id.clone() });
            }
        }
        if relationship.member_id1 == relationship.member_id2 {
            return Err(Error::SelfRelationship {
                id: relationship.member_id1,
            });
        }
        let pair = relationship.pair();
        if self.relationships.iter().any(|r| r.pair() == pair) {
            return Err(Error::DuplicateRelationship {
                member_id1: relationship.member_id1,
                member_id2: relationship.member_id2,
            });
        }
        if relationship.id.is_empty() {
            relationship.id = uuid::Uuid::new_v4().to_string();
        } else if self.relationships.iter().any(|r| r.id == relationship.id) {
            return Err(Error::DuplicateRelationship {
                member_id1: relationship.member_id1,
                member_id2: relationship.member_id2,
            });
        }
        self.relationships.push(relationship);
        let last = self.relationships.len() - 1;
        Ok(&self.relationships[last])
    }

    pub fn remove_relationship(&mut self, id: &str) -> Result<Relationship> {
        let Some(pos) = self.relationships.iter().position(|r| r.id == id) else {
            return Err(Error::UnknownRelationship { id: id.to_string() });
        };
        Ok(self.relationships.remove(pos))
    }

    pub fn select(&mut self, id: Option<&str>) -> Result<()> {
        match id {
            Some(id) if !self.members.contains_key(id) => {
                Err(Error::UnknownMember { id: id.to_string() })
            }
            _ => {
                self.selected = id.map(str::to_string);
                Ok(())
            }
        }
    }

    pub fn selected(&self) -> Option<&Member> {
        self.selected.as_deref().and_then(|id| self.members.get(id))
    }

    /// Joined snapshot for layout.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_records(self.members.values().cloned().collect(), &self.relationships)
    }

    fn ensure_no_primary_except(&self, id: &str) -> Result<()> {
        match self.members.values().find(|m| m.is_primary && m.id != id) {
            Some(existing) => Err(Error::MultiplePrimary {
                existing: existing.id.clone(),
            }),
            None => Ok(()),
        }
    }
}
