//! Serde integration for the types a host loads from config or stores.
//!
//! These tests verify that:
//! - categories serialize as their tag and accept detector labels
//! - invalid tags and unknown config fields are rejected
//! - a missing config field falls back to its default

#![cfg(feature = "serde")]

use placeholder_redaction::{EntityCategory, Placeholder, RedactionConfig, Slot};
use serde::{de::DeserializeOwned, Serialize};

fn round_trip<T: Serialize + DeserializeOwned>(value: &T) -> T {
    let json = serde_json::to_string(value).unwrap();
    serde_json::from_str(&json).unwrap()
}

#[test]
fn test_category_serializes_as_tag() {
    assert_eq!(
        serde_json::to_string(&EntityCategory::Person).unwrap(),
        "\"PERSON\""
    );

    let iban = EntityCategory::custom("IBAN").unwrap();
    assert_eq!(serde_json::to_string(&iban).unwrap(), "\"IBAN\"");
    assert_eq!(round_trip(&iban), iban);
}

#[test]
fn test_category_accepts_detector_labels() {
    let parsed: Vec<EntityCategory> =
        serde_json::from_str(r#"["gpe", "ORGANIZATION", "person", "phone"]"#).unwrap();
    assert_eq!(
        parsed,
        vec![
            EntityCategory::Location,
            EntityCategory::Org,
            EntityCategory::Person,
            EntityCategory::Phone,
        ]
    );
}

#[test]
fn test_invalid_category_is_rejected() {
    assert!(serde_json::from_str::<EntityCategory>("\"bad tag!\"").is_err());
    assert!(serde_json::from_str::<EntityCategory>("\"\"").is_err());
}

#[test]
fn test_config_round_trip() {
    let config = RedactionConfig::new()
        .only([EntityCategory::Person, EntityCategory::Email])
        .with_min_confidence(0.5)
        .with_max_slots_per_category(100);

    assert_eq!(round_trip(&config), config);
}

#[test]
fn test_config_fields_default_when_missing() {
    let empty: RedactionConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, RedactionConfig::default());

    let partial: RedactionConfig =
        serde_json::from_str(r#"{"categories": ["gpe"], "min_confidence": 0.7}"#).unwrap();
    assert_eq!(
        partial,
        RedactionConfig::new()
            .only([EntityCategory::Location])
            .with_min_confidence(0.7)
    );
}

#[test]
fn test_config_rejects_unknown_fields() {
    let err = serde_json::from_str::<RedactionConfig>(r#"{"max_slots": 3}"#).unwrap_err();
    assert!(err.to_string().contains("max_slots"));
}

#[test]
fn test_placeholder_round_trip() {
    let placeholder = Placeholder::new(EntityCategory::Money, Slot::new(27));
    let json = serde_json::to_value(&placeholder).unwrap();

    assert_eq!(json["category"], "MONEY");
    assert_eq!(json["slot"], 27);
    assert_eq!(round_trip(&placeholder), placeholder);
}
