use crate::{FontSize, PreferenceDocument, PreferencePatch, SourceTier, Theme};

use chrono::{TimeZone, Utc};
use serde_json::{Map, json};

fn patch(value: serde_json::Value) -> PreferencePatch {
    value.as_object().cloned().unwrap()
}

#[test]
fn given_partial_object_when_parsed_then_missing_keys_default() {
    let object = patch(json!({ "theme": "dark", "fontSize": "large" }));

    let doc = PreferenceDocument::from_object(object);

    assert_eq!(doc.theme, Theme::Dark);
    assert_eq!(doc.font_size, FontSize::Large);
    assert_eq!(doc.language, "en");
    assert_eq!(doc.items_per_page, 20);
    assert_eq!(doc.source_tier(), SourceTier::BuiltIn);
}

#[test]
fn given_unknown_keys_when_parsed_then_kept_in_extra_and_written_back() {
    let object = patch(json!({ "sidebarCollapsed": true, "playbackRate": 1.5 }));

    let doc = PreferenceDocument::from_object(object);
    let written = doc.to_object();

    assert_eq!(doc.extra.get("sidebarCollapsed"), Some(&json!(true)));
    assert_eq!(written.get("playbackRate"), Some(&json!(1.5)));
    assert!(written.contains_key("_metadata"));
}

#[test]
fn given_unrepresentable_values_when_parsed_then_defaults_and_raw_kept() {
    let object = patch(json!({
        "theme": "high-contrast",
        "fontSize": "x-large",
        "itemsPerPage": "20",
        "language": "ja",
        "_metadata": "garbage"
    }));

    let doc = PreferenceDocument::from_object(object);

    assert_eq!(doc.theme, Theme::Light);
    assert_eq!(doc.font_size, FontSize::Medium);
    assert_eq!(doc.items_per_page, 20);
    assert_eq!(doc.language, "ja");
    assert_eq!(doc.source_tier(), SourceTier::BuiltIn);

    let mut unrecognized = doc.unrecognized_settings();
    unrecognized.sort_unstable();
    assert_eq!(unrecognized, vec!["fontSize", "itemsPerPage", "theme"]);

    let written = doc.to_object();
    assert_eq!(written.get("theme"), Some(&json!("high-contrast")));
    assert!(written["_metadata"].is_object());
}

#[test]
fn given_unreadable_stored_value_when_unrelated_key_patched_then_patch_applies() {
    let doc = PreferenceDocument::from_object(patch(json!({ "theme": "high-contrast" })));

    let updated = doc.apply_patch(&patch(json!({ "language": "de" }))).unwrap();

    assert_eq!(updated.language, "de");
    assert_eq!(updated.to_object().get("theme"), Some(&json!("high-contrast")));
}

#[test]
fn given_unreadable_stored_value_when_same_key_patched_then_replaced() {
    let doc = PreferenceDocument::from_object(patch(json!({ "theme": "high-contrast" })));

    let updated = doc.apply_patch(&patch(json!({ "theme": "dark" }))).unwrap();

    assert_eq!(updated.theme, Theme::Dark);
    assert!(updated.unrecognized_settings().is_empty());
    assert_eq!(updated.to_object().get("theme"), Some(&json!("dark")));
}

#[test]
fn given_metadata_when_serialized_then_uses_wire_names() {
    let doc = PreferenceDocument::defaults()
        .with_source(SourceTier::Server)
        .stamped(Utc.timestamp_opt(1_700_000_000, 0).unwrap(), Some("u-9"));

    let object = doc.to_object();

    assert_eq!(object["_metadata"]["sourceTier"], "server");
    assert_eq!(object["_metadata"]["userId"], "u-9");
    assert!(object["_metadata"]["lastSaved"].is_string());
}

#[test]
fn given_valid_patch_when_applied_then_only_named_keys_change() {
    let doc = PreferenceDocument::defaults();

    let updated = doc
        .apply_patch(&patch(json!({ "theme": "dark", "customKey": "x" })))
        .unwrap();

    assert_eq!(updated.theme, Theme::Dark);
    assert_eq!(updated.extra.get("customKey"), Some(&json!("x")));
    assert_eq!(updated.language, doc.language);
}

#[test]
fn given_wrongly_typed_value_when_patched_then_rejected_with_key() {
    let doc = PreferenceDocument::defaults();

    let result = doc.apply_patch(&patch(json!({ "itemsPerPage": "many" })));

    let err = result.unwrap_err();
    assert!(err.to_string().contains("itemsPerPage"));
}

#[test]
fn given_metadata_in_patch_when_applied_then_ignored() {
    let doc = PreferenceDocument::defaults();

    let updated = doc
        .apply_patch(&patch(json!({ "_metadata": { "sourceTier": "server" } })))
        .unwrap();

    assert_eq!(updated.source_tier(), SourceTier::BuiltIn);
}

#[test]
fn given_prior_object_when_merged_over_then_prior_only_keys_survive() {
    let mut prior = Map::new();
    prior.insert("legacyFlag".to_string(), json!(true));
    prior.insert("theme".to_string(), json!("dark"));
    let doc = PreferenceDocument::defaults();

    let merged = doc.merged_over(&prior);

    assert_eq!(merged.get("legacyFlag"), Some(&json!(true)));
    assert_eq!(merged.get("theme"), Some(&json!("light")));
}

#[test]
fn test_has_default_settings_ignores_metadata() {
    let doc = PreferenceDocument::defaults().stamped(Utc::now(), Some("u-1"));
    assert!(doc.has_default_settings());

    let changed = doc.apply_patch(&patch(json!({ "showProgress": false }))).unwrap();
    assert!(!changed.has_default_settings());
}
