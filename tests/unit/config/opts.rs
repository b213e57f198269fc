use super::*;

#[test]
fn defaults_match_reserved_names() {
    let opts = ResolveOpts::default();
    assert_eq!(opts.slot_tag, "Slot");
    assert_eq!(opts.target_slot_key, "targetSlot");
    assert_eq!(opts.max_nesting_depth, 5);
    assert_eq!(opts.default_slot, DefaultSlotPolicy::FirstUnfilledRequired);
    opts.validate().unwrap();
}

#[test]
fn partial_json_fills_defaults() {
    let opts: ResolveOpts =
        serde_json::from_str(r#"{ "defaultSlot": "first-required", "maxNestingDepth": 3 }"#)
            .unwrap();
    assert_eq!(opts.default_slot, DefaultSlotPolicy::FirstRequired);
    assert_eq!(opts.max_nesting_depth, 3);
    assert_eq!(opts.slot_tag, SLOT_TAG);
}

#[test]
fn validate_rejects_degenerate_values() {
    let opts = ResolveOpts {
        slot_tag: " ".to_string(),
        ..ResolveOpts::default()
    };
    assert!(opts.validate().is_err());

    let opts = ResolveOpts {
        max_nesting_depth: 0,
        ..ResolveOpts::default()
    };
    let err = opts.validate().unwrap_err();
    assert!(err.to_string().contains("maxNestingDepth"));
}
