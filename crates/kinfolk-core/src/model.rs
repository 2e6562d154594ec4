//! Member and relationship records.
//!
//! Field names follow the JSON the application's REST layer produces (`camelCase` keys,
//! `SCREAMING_CASE` enum values) so snapshots can be decoded without a mapping layer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Governs downstream visibility of a member. Layout ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrivacyLevel {
    #[default]
    Private,
    Family,
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    /// `member_id1` is a parent of `member_id2`.
    Parent,
    /// `member_id1` is a child of `member_id2`.
    Child,
    Spouse,
    Sibling,
}

impl RelationshipType {
    pub fn is_symmetric(self) -> bool {
        matches!(self, Self::Spouse | Self::Sibling)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    #[serde(default)]
    pub id: String,
    pub member_id1: String,
    pub member_id2: String,
    pub relationship_type: RelationshipType,
}

impl Relationship {
    pub fn new(
        member_id1: impl Into<String>,
        member_id2: impl Into<String>,
        relationship_type: RelationshipType,
    ) -> Self {
        Self {
            id: String::new(),
            member_id1: member_id1.into(),
            member_id2: member_id2.into(),
            relationship_type,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Returns the endpoint opposite to `member_id`, or `None` if the record does not touch it.
    pub fn other(&self, member_id: &str) -> Option<&str> {
        if self.member_id1 == member_id {
            Some(self.member_id2.as_str())
        } else if self.member_id2 == member_id {
            Some(self.member_id1.as_str())
        } else {
            None
        }
    }

    /// Unordered endpoint pair, smaller id first.
    pub fn pair(&self) -> (&str, &str) {
        let (a, b) = (self.member_id1.as_str(), self.member_id2.as_str());
        if a <= b { (a, b) } else { (b, a) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub privacy_level: PrivacyLevel,
    #[serde(default)]
    pub is_primary: bool,
    /// Records where this member is `member_id1`.
    #[serde(default)]
    pub relationships_from: Vec<Relationship>,
    /// Records where this member is `member_id2`.
    #[serde(default)]
    pub relationships_to: Vec<Relationship>,
}

impl Member {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            photo_url: None,
            dob: None,
            gender: None,
            bio: None,
            location: None,
            privacy_level: PrivacyLevel::default(),
            is_primary: false,
            relationships_from: Vec::new(),
            relationships_to: Vec::new(),
        }
    }

    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_dob(mut self, dob: impl Into<String>) -> Self {
        self.dob = Some(dob.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Drops the joined relationship arrays, keeping only the member's own attributes.
    pub fn detached(&self) -> Self {
        Self {
            relationships_from: Vec::new(),
            relationships_to: Vec::new(),
            ..self.clone()
        }
    }
}
