#![forbid(unsafe_code)]

//! Family-tree data model (headless).
//!
//! Everything the layout engine consumes lives here: members and relationship records as the
//! application's REST layer ships them, snapshot joining, view configuration and the in-memory
//! tree editor that enforces the relationship invariants upstream of layout.

pub mod config;
pub mod dates;
pub mod error;
pub mod model;
pub mod snapshot;
pub mod tree;

pub use config::{DisplaySettings, Expansion, LayoutConfig, NodeSize, Orientation, ViewConfig};
pub use error::{Error, Result};
pub use model::{Gender, Member, PrivacyLevel, Relationship, RelationshipType};
pub use snapshot::Snapshot;
pub use tree::{FamilyTree, MemberPatch};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
