pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config JSON error: {0}")]
    ConfigJson(serde_json::Error),

    #[error("invalid snapshot: {message}")]
    InvalidSnapshot { message: String },

    #[error("invalid config value for `{key}`: {message}")]
    InvalidConfig { key: String, message: String },

    #[error("member already exists: {id}")]
    DuplicateMember { id: String },

    #[error("unknown member: {id}")]
    UnknownMember { id: String },

    #[error("a member cannot be related to itself: {id}")]
    SelfRelationship { id: String },

    #[error("a relationship between {member_id1} and {member_id2} already exists")]
    DuplicateRelationship {
        member_id1: String,
        member_id2: String,
    },

    #[error("unknown relationship: {id}")]
    UnknownRelationship { id: String },

    #[error("tree already has a primary member: {existing}")]
    MultiplePrimary { existing: String },
}
