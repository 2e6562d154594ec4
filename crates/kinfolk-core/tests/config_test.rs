use kinfolk_core::{DisplaySettings, Error, LayoutConfig, Orientation, ViewConfig};
use serde_json::json;

#[test]
fn layout_config_reads_tree_keys() {
    let cfg = ViewConfig::from_value(json!({
        "tree": {
            "levelsUp": 5,
            "levelsDown": 1,
            "includeSiblingEdges": false,
            "orientation": "bt",
            "spouseOffset": 150,
            "verticalSpacing": 100.5
        }
    }));
    let lc = LayoutConfig::from_view_config(&cfg).unwrap();
    assert_eq!(lc.levels_up, 5);
    assert_eq!(lc.levels_down, 1);
    assert!(!lc.include_sibling_edges);
    assert_eq!(lc.orientation, Orientation::BT);
    assert_eq!(lc.spouse_offset, 150.0);
    assert_eq!(lc.vertical_spacing, 100.5);
    assert_eq!(lc.horizontal_spacing, 300.0);
}

#[test]
fn layout_config_rejects_bad_values() {
    let bad = [
        json!({"tree": {"levelsUp": -1}}),
        json!({"tree": {"levelsDown": 1.5}}),
        json!({"tree": {"orientation": "LR"}}),
        json!({"tree": {"spouseOffset": "wide"}}),
        json!({"tree": {"includeSiblingEdges": "yes"}}),
    ];
    for v in bad {
        let err = LayoutConfig::from_view_config(&ViewConfig::from_value(v.clone())).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }), "{v}");
    }
}

#[test]
fn null_values_fall_back_to_defaults() {
    let cfg = ViewConfig::from_value(json!({"tree": {"levelsUp": null}}));
    assert_eq!(LayoutConfig::from_view_config(&cfg).unwrap().levels_up, 3);
}

#[test]
fn interactive_preset_drops_sibling_edges() {
    assert!(LayoutConfig::default().include_sibling_edges);
    assert!(!LayoutConfig::interactive().include_sibling_edges);
}

#[test]
fn display_settings_default_to_shown() {
    let d = DisplaySettings::from_view_config(&ViewConfig::default()).unwrap();
    assert!(d.show_dob && d.show_location);

    let cfg = ViewConfig::from_value(json!({"display": {"showDob": false}}));
    let d = DisplaySettings::from_view_config(&cfg).unwrap();
    assert!(!d.show_dob);
    assert!(d.show_location);
}

#[test]
fn layout_config_deserializes_with_defaults() {
    let lc: LayoutConfig =
        serde_json::from_value(json!({"levelsUp": 1, "orientation": "BT"})).unwrap();
    assert_eq!(lc.levels_up, 1);
    assert_eq!(lc.orientation, Orientation::BT);
    assert_eq!(lc.levels_down, 3);
}

#[test]
fn null_orientation_keeps_the_default() {
    let cfg = ViewConfig::from_value(json!({"tree": {"orientation": null, "levelsDown": 2}}));
    let lc = LayoutConfig::from_view_config(&cfg).unwrap();
    assert_eq!(lc.orientation, Orientation::TB);
    assert_eq!(lc.levels_down, 2);

    let bt = LayoutConfig {
        orientation: Orientation::BT,
        ..LayoutConfig::default()
    };
    assert_eq!(bt.with_view_config(&cfg).unwrap().orientation, Orientation::BT);
}

#[test]
fn malformed_config_json_is_a_config_error() {
    let err = ViewConfig::from_json(r#"{"tree": {"levelsUp": 2,}}"#).unwrap_err();
    assert!(matches!(err, Error::ConfigJson(_)));
    assert!(err.to_string().starts_with("config JSON error"), "{err}");
}

#[test]
fn layered_configs_then_overrides() {
    let mut cfg = ViewConfig::from_json(r#"{"tree": {"levelsUp": 1, "orientation": "BT"}}"#)
        .unwrap();
    cfg.merge(&ViewConfig::from_value(json!({"tree": {"levelsUp": 4}})));
    cfg.apply_override("tree.spouseOffset=120").unwrap();

    let lc = LayoutConfig::from_view_config(&cfg).unwrap();
    assert_eq!(lc.levels_up, 4);
    assert_eq!(lc.orientation, Orientation::BT);
    assert_eq!(lc.spouse_offset, 120.0);
}
