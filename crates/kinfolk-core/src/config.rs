//! View configuration.
//!
//! `ViewConfig` is the loosely-typed JSON document the application stores per tree (tree
//! settings plus view preferences). `LayoutConfig` and `DisplaySettings` are the typed views the
//! layout engine consumes; both are read out of a `ViewConfig` with validation.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig(Value);

impl Default for ViewConfig {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl ViewConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map(Self).map_err(Error::ConfigJson)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    /// Stores `value` at `dotted_path`, replacing any non-object found on the way.
    pub fn set(&mut self, dotted_path: &str, value: Value) {
        let mut slot = &mut self.0;
        for segment in dotted_path.split('.') {
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Value::Object(map) = slot else {
                return;
            };
            slot = map.entry(segment).or_insert(Value::Null);
        }
        *slot = value;
    }

    /// Applies a `key.path=value` assignment. The value is read as JSON when it parses and as a
    /// plain string otherwise, so `tree.levelsUp=2` and `tree.orientation=BT` both work.
    pub fn apply_override(&mut self, assignment: &str) -> Result<()> {
        let invalid = |message: &str| Error::InvalidConfig {
            key: assignment.to_string(),
            message: message.to_string(),
        };
        let (key, raw) = assignment
            .split_once('=')
            .ok_or_else(|| invalid("expected key=value"))?;
        let key = key.trim();
        if key.split('.').any(str::is_empty) {
            return Err(invalid("empty key segment"));
        }
        let value = serde_json::from_str(raw.trim())
            .unwrap_or_else(|_| Value::String(raw.trim().to_string()));
        self.set(key, value);
        Ok(())
    }

    /// Layers `overlay` over this config. Objects merge key by key; any other overlay value
    /// replaces what was there.
    pub fn merge(&mut self, overlay: &ViewConfig) {
        merge_layer(&mut self.0, &overlay.0);
    }

    fn typed<T>(
        &self,
        key: &str,
        expected: &str,
        read: impl Fn(&Value) -> Option<T>,
    ) -> Result<Option<T>> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => read(v).map(Some).ok_or_else(|| Error::InvalidConfig {
                key: key.to_string(),
                message: format!("expected {expected}, found {v}"),
            }),
        }
    }

    fn spacing(&self, key: &str) -> Result<Option<f64>> {
        self.typed(key, "a non-negative number", |v| {
            v.as_f64().filter(|n| n.is_finite() && *n >= 0.0)
        })
    }

    fn level(&self, key: &str) -> Result<Option<u32>> {
        self.typed(key, "a non-negative integer", |v| {
            v.as_u64().and_then(|n| u32::try_from(n).ok())
        })
    }

    fn flag(&self, key: &str) -> Result<Option<bool>> {
        self.typed(key, "a boolean", Value::as_bool)
    }
}

fn merge_layer(base: &mut Value, overlay: &Value) {
    let Value::Object(overlay_map) = overlay else {
        *base = overlay.clone();
        return;
    };
    if !base.is_object() {
        *base = Value::Object(Map::new());
    }
    let Value::Object(base_map) = base else {
        return;
    };
    for (key, value) in overlay_map {
        match base_map.get_mut(key) {
            Some(slot) => merge_layer(slot, value),
            None => {
                base_map.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Vertical direction generations are stacked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Oldest generation at the top.
    #[default]
    TB,
    /// Oldest generation at the bottom.
    BT,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Self::TB => Self::BT,
            Self::BT => Self::TB,
        }
    }
}

impl FromStr for Orientation {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tb" | "td" | "top-down" => Ok(Self::TB),
            "bt" | "bottom-up" => Ok(Self::BT),
            _ => Err(()),
        }
    }
}

/// Per-direction "show more" state of the visibility window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Expansion {
    pub up: bool,
    pub down: bool,
}

impl Expansion {
    pub fn collapsed() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self { up: true, down: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub levels_up: u32,
    pub levels_down: u32,
    pub include_sibling_edges: bool,
    pub orientation: Orientation,
    pub spouse_offset: f64,
    pub vertical_spacing: f64,
    pub horizontal_spacing: f64,
    pub node_size: NodeSize,
    /// Size of the primary member's node.
    pub large_node_size: NodeSize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            levels_up: 3,
            levels_down: 3,
            include_sibling_edges: true,
            orientation: Orientation::TB,
            spouse_offset: 200.0,
            vertical_spacing: 280.0,
            horizontal_spacing: 300.0,
            node_size: NodeSize {
                width: 140.0,
                height: 120.0,
            },
            large_node_size: NodeSize {
                width: 200.0,
                height: 180.0,
            },
        }
    }
}

impl LayoutConfig {
    /// Preset for the interactive graph view, which leaves sibling links out.
    pub fn interactive() -> Self {
        Self {
            include_sibling_edges: false,
            ..Self::default()
        }
    }

    /// Reads `tree.*` keys from `cfg` on top of `self`.
    pub fn with_view_config(mut self, cfg: &ViewConfig) -> Result<Self> {
        if let Some(v) = cfg.level("tree.levelsUp")? {
            self.levels_up = v;
        }
        if let Some(v) = cfg.level("tree.levelsDown")? {
            self.levels_down = v;
        }
        if let Some(v) = cfg.flag("tree.includeSiblingEdges")? {
            self.include_sibling_edges = v;
        }
        if let Some(v) = cfg.typed("tree.orientation", "\"TB\" or \"BT\"", |v| {
            v.as_str()?.parse::<Orientation>().ok()
        })? {
            self.orientation = v;
        }
        if let Some(v) = cfg.spacing("tree.spouseOffset")? {
            self.spouse_offset = v;
        }
        if let Some(v) = cfg.spacing("tree.verticalSpacing")? {
            self.vertical_spacing = v;
        }
        if let Some(v) = cfg.spacing("tree.horizontalSpacing")? {
            self.horizontal_spacing = v;
        }
        Ok(self)
    }

    pub fn from_view_config(cfg: &ViewConfig) -> Result<Self> {
        Self::default().with_view_config(cfg)
    }
}

/// Which optional member attributes appear on rendered nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DisplaySettings {
    pub show_dob: bool,
    pub show_location: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_dob: true,
            show_location: true,
        }
    }
}

impl DisplaySettings {
    pub fn from_view_config(cfg: &ViewConfig) -> Result<Self> {
        let mut out = Self::default();
        if let Some(v) = cfg.flag("display.showDob")? {
            out.show_dob = v;
        }
        if let Some(v) = cfg.flag("display.showLocation")? {
            out.show_location = v;
        }
        Ok(out)
    }
}
