#![forbid(unsafe_code)]

//! Generation-based family tree layout.
//!
//! The pipeline is pure and deterministic: a member snapshot goes in, positioned nodes and
//! deduplicated typed edges come out.
//!
//! 1. [`index`] resolves relationship direction once into tagged [`Kin`] records.
//! 2. [`generation`] assigns every member a signed depth relative to the primary.
//! 3. [`window`] clips the generations to the visible range.
//! 4. [`position`] places visible members, centering parents over their children.
//! 5. [`color`] assigns branch colors.
//! 6. [`edges`] synthesizes parent/spouse/sibling edges.

pub mod cache;
pub mod color;
pub mod edges;
pub mod generation;
pub mod index;
pub mod list_view;
pub mod model;
pub mod pipeline;
pub mod position;
pub mod window;

pub use cache::LayoutCache;
pub use color::{BranchColors, ColorToken};
pub use generation::{GenerationMap, assign_generations};
pub use index::{Kin, KinRole, RelationshipIndex};
pub use list_view::{GenerationGroup, ListView, generation_label, list_view};
pub use model::{
    EdgeCurve, EdgeKind, EdgeMarker, EdgeStyle, HiddenCounts, LayoutEdge, LayoutNode, MemberCard,
    NodeData, Point, TreeLayout,
};
pub use pipeline::{LayoutOptions, generations_of, layout_tree};
pub use window::{VisibilityWindow, window};

pub use kinfolk_core as core;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
