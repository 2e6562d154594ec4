//! Branch colors.
//!
//! Members are colored from a small recurring palette so family lines read as groups. The
//! palette index advances after every second member within a generation, which keeps sibling
//! and spouse pairs on one color; it carries over between generations.

use kinfolk_core::{Gender, Member};
use rustc_hash::FxHashMap as HashMap;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorToken {
    Blue,
    Emerald,
    Amber,
    Violet,
    Pink,
    Teal,
    Slate,
}

impl ColorToken {
    pub fn hex(self) -> &'static str {
        match self {
            Self::Blue => "#3b82f6",
            Self::Emerald => "#10b981",
            Self::Amber => "#f59e0b",
            Self::Violet => "#8b5cf6",
            Self::Pink => "#ec4899",
            Self::Teal => "#14b8a6",
            Self::Slate => "#94a3b8",
        }
    }
}

impl Serialize for ColorToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.hex())
    }
}

impl std::fmt::Display for ColorToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.hex())
    }
}

pub const BRANCH_PALETTE: [ColorToken; 6] = [
    ColorToken::Blue,
    ColorToken::Emerald,
    ColorToken::Amber,
    ColorToken::Violet,
    ColorToken::Pink,
    ColorToken::Teal,
];

pub const PRIMARY_COLOR: ColorToken = ColorToken::Amber;
pub const SPOUSE_EDGE_COLOR: ColorToken = ColorToken::Pink;
pub const SIBLING_EDGE_COLOR: ColorToken = ColorToken::Slate;

/// Default color for members without a branch color.
pub fn gender_color(gender: Option<Gender>) -> ColorToken {
    match gender {
        Some(Gender::Male) => ColorToken::Blue,
        Some(Gender::Female) => ColorToken::Pink,
        Some(Gender::Other) | None => ColorToken::Violet,
    }
}

/// Color a member's node is drawn with: primary first, then branch, then gender.
pub fn node_color(member: &Member, branch: Option<ColorToken>) -> ColorToken {
    if member.is_primary {
        return PRIMARY_COLOR;
    }
    branch.unwrap_or_else(|| gender_color(member.gender))
}

#[derive(Debug, Clone, Default)]
pub struct BranchColors {
    assigned: HashMap<String, ColorToken>,
    palette_index: usize,
}

impl BranchColors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Colors `(generation, members)` rows in render order.
    pub fn from_rows<'a, R, I>(rows: R) -> Self
    where
        R: IntoIterator<Item = (i32, I)>,
        I: IntoIterator<Item = &'a str>,
    {
        let mut colors = Self::new();
        for (generation, row) in rows {
            for (sibling_index, id) in row.into_iter().enumerate() {
                colors.color_for(id, generation, sibling_index);
            }
        }
        colors
    }

    /// Assigns (once) and returns `member_id`'s branch color. `sibling_index` is the member's
    /// position within its generation row.
    ///
    /// The palette position depends only on the order of calls, so `generation_index` does not
    /// change the color; it is recorded in the trace output.
    pub fn color_for(
        &mut self,
        member_id: &str,
        generation_index: i32,
        sibling_index: usize,
    ) -> ColorToken {
        if let Some(&c) = self.assigned.get(member_id) {
            return c;
        }
        let c = BRANCH_PALETTE[self.palette_index % BRANCH_PALETTE.len()];
        tracing::trace!(
            member = member_id,
            generation = generation_index,
            sibling = sibling_index,
            color = %c,
            "assigned branch color"
        );
        self.assigned.insert(member_id.to_string(), c);
        if sibling_index % 2 == 1 {
            self.palette_index += 1;
        }
        c
    }

    pub fn get(&self, member_id: &str) -> Option<ColorToken> {
        self.assigned.get(member_id).copied()
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_share_a_color_and_index_carries_over_rows() {
        let colors = BranchColors::from_rows([(-1, vec!["a", "b", "c"]), (0, vec!["d", "e"])]);
        assert_eq!(colors.get("a"), Some(ColorToken::Blue));
        assert_eq!(colors.get("b"), Some(ColorToken::Blue));
        assert_eq!(colors.get("c"), Some(ColorToken::Emerald));
        // Row two starts where row one left off.
        assert_eq!(colors.get("d"), Some(ColorToken::Emerald));
        assert_eq!(colors.get("e"), Some(ColorToken::Emerald));
    }

    #[test]
    fn palette_wraps_around() {
        let ids: Vec<String> = (0..14).map(|i| format!("m{i}")).collect();
        let colors = BranchColors::from_rows([(0, ids.iter().map(String::as_str))]);
        assert_eq!(colors.get("m12"), Some(ColorToken::Blue));
        assert_eq!(colors.get("m13"), Some(ColorToken::Blue));
    }

    #[test]
    fn first_assignment_sticks() {
        let mut colors = BranchColors::new();
        assert_eq!(colors.color_for("x", 0, 1), ColorToken::Blue);
        assert_eq!(colors.color_for("x", 2, 0), ColorToken::Blue);
        assert_eq!(colors.len(), 1);
    }

    #[test]
    fn generation_does_not_shift_the_palette() {
        let mut a = BranchColors::new();
        let mut b = BranchColors::new();
        for (i, id) in ["w", "x", "y"].into_iter().enumerate() {
            assert_eq!(a.color_for(id, 0, i), b.color_for(id, -4 + i as i32, i));
        }
        assert_eq!(a.get("y"), Some(ColorToken::Emerald));
    }

    #[test]
    fn primary_and_gender_fallbacks() {
        let primary = Member::new("p", "P").primary();
        assert_eq!(node_color(&primary, Some(ColorToken::Teal)), ColorToken::Amber);

        let man = Member::new("m", "M").with_gender(Gender::Male);
        assert_eq!(node_color(&man, None), ColorToken::Blue);
        assert_eq!(node_color(&man, Some(ColorToken::Teal)), ColorToken::Teal);

        let woman = Member::new("w", "W").with_gender(Gender::Female);
        assert_eq!(node_color(&woman, None), ColorToken::Pink);
        assert_eq!(node_color(&Member::new("u", "U"), None), ColorToken::Violet);
    }

    #[test]
    fn serializes_as_hex() {
        assert_eq!(
            serde_json::to_string(&ColorToken::Amber).unwrap(),
            "\"#f59e0b\""
        );
    }
}
