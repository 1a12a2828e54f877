//! Restoration of untrusted service output.
//!
//! Generated text may repeat, drop, invent, or mangle placeholders. These
//! tests check that only issued tokens are replaced and that everything else
//! is left in place and reported.

use placeholder_redaction::{
    restore, AnomalyReason, EntityCategory, Placeholder, PlaceholderAllocator, RedactionMap,
    RestorationEngine, Slot,
};

fn map_of(entries: &[(EntityCategory, &str)]) -> RedactionMap {
    let mut allocator = PlaceholderAllocator::new();
    for (category, value) in entries {
        allocator.allocate(category, value).unwrap();
    }
    allocator.into_map()
}

#[test]
fn test_invented_placeholder_is_contained() {
    let map = map_of(&[(EntityCategory::Person, "Jane Doe")]);
    let restoration = restore("[PERSON_A] and [PERSON_Z] agreed.", &map);

    assert_eq!(restoration.text(), "Jane Doe and [PERSON_Z] agreed.");
    assert_eq!(restoration.report().len(), 1);
    assert_eq!(restoration.report().unmapped(), 1);

    let anomaly = restoration.report().iter().next().unwrap();
    assert_eq!(anomaly.token, "[PERSON_Z]");
    assert_eq!(anomaly.offset, 15);
}

#[test]
fn test_restoring_plain_text_is_idempotent() {
    let map = map_of(&[(EntityCategory::Person, "Jane Doe")]);
    let first = restore("Dear [PERSON_A], see you soon.", &map);
    let second = restore(first.text(), &map);

    assert_eq!(second.text(), first.text());
    assert!(second.report().is_empty());
    assert_eq!(second.resolved(), 0);
}

#[test]
fn test_repeated_and_dropped_tokens() {
    let map = map_of(&[
        (EntityCategory::Person, "Jane Doe"),
        (EntityCategory::Org, "Acme"),
    ]);
    let restoration = restore("[PERSON_A], [PERSON_A] and [PERSON_A].", &map);

    assert_eq!(restoration.text(), "Jane Doe, Jane Doe and Jane Doe.");
    assert_eq!(restoration.resolved(), 3);
    assert_eq!(
        restoration.missing(),
        &[Placeholder::new(EntityCategory::Org, Slot::FIRST)]
    );
    assert_eq!(restoration.audit().missing, 1);
}

#[test]
fn test_substituted_values_are_not_rescanned() {
    let map = map_of(&[
        (EntityCategory::Person, "[PERSON_B]"),
        (EntityCategory::Person, "Bob"),
    ]);
    let restoration = restore("[PERSON_A] and [PERSON_B]", &map);

    assert_eq!(restoration.text(), "[PERSON_B] and Bob");
    assert_eq!(restoration.resolved(), 2);
    assert!(restoration.report().is_empty());
}

#[test]
fn test_mangled_tokens_are_reported_in_order() {
    let map = map_of(&[(EntityCategory::Person, "Jane Doe")]);
    let text = "[person_a] [PERSON_1] [PERSON_A PERSON_A] [PERSON_A]";
    let restoration = restore(text, &map);

    let found: Vec<(&str, usize, AnomalyReason)> = restoration
        .report()
        .iter()
        .map(|anomaly| (anomaly.token.as_str(), anomaly.offset, anomaly.reason))
        .collect();
    assert_eq!(
        found,
        vec![
            ("[person_a]", 0, AnomalyReason::MalformedToken),
            ("[PERSON_1]", 11, AnomalyReason::MalformedToken),
            ("[PERSON_A", 22, AnomalyReason::MalformedToken),
            ("PERSON_A]", 32, AnomalyReason::MalformedToken),
        ]
    );
    assert_eq!(
        restoration.text(),
        "[person_a] [PERSON_1] [PERSON_A PERSON_A] Jane Doe"
    );
}

#[test]
fn test_ordinary_identifiers_are_not_flagged() {
    let map = map_of(&[(EntityCategory::Person, "Jane Doe")]);
    let text = "Set max_retries and see [some_link] or user_id_2.";
    let restoration = restore(text, &map);

    assert_eq!(restoration.text(), text);
    assert!(restoration.report().is_empty());
}

#[test]
fn test_field_names_survive_repeated_restores() {
    let map = map_of(&[(EntityCategory::Person, "Jane Doe")]);
    let first = restore("Fill EMAIL_ADDRESS for [PERSON_A]", &map);
    assert_eq!(first.text(), "Fill EMAIL_ADDRESS for Jane Doe");
    assert!(first.report().is_empty());

    let second = restore(first.text(), &map);
    assert_eq!(second.text(), first.text());
    assert!(second.report().is_empty());
}

#[test]
fn test_bracketed_prose_is_not_flagged() {
    let map = map_of(&[(EntityCategory::Person, "Jane Doe")]);
    let text = "Ask [PERSON_A] about it [see NOTE_A] and ID_TOKEN.";
    let restoration = restore(text, &map);

    assert_eq!(
        restoration.text(),
        "Ask Jane Doe about it [see NOTE_A] and ID_TOKEN."
    );
    assert!(restoration.report().is_empty());
}

#[test]
fn test_unknown_custom_category_is_malformed() {
    let iban = EntityCategory::custom("IBAN").unwrap();
    let map = map_of(&[(iban, "DE89370400440532013000")]);
    let restoration = RestorationEngine::new().restore("[IBAN_A] [IBAN_B] [ACCOUNT_A]", &map);

    assert_eq!(
        restoration.text(),
        "DE89370400440532013000 [IBAN_B] [ACCOUNT_A]"
    );
    let reasons: Vec<AnomalyReason> = restoration
        .report()
        .iter()
        .map(|anomaly| anomaly.reason)
        .collect();
    assert_eq!(
        reasons,
        vec![
            AnomalyReason::UnmappedPlaceholder,
            AnomalyReason::MalformedToken
        ]
    );
}

#[test]
fn test_tokens_adjacent_to_punctuation() {
    let map = map_of(&[(EntityCategory::Person, "Jane")]);
    let restoration = restore("([PERSON_A]) [PERSON_A]'s \"[PERSON_A]\"", &map);

    assert_eq!(restoration.text(), "(Jane) Jane's \"Jane\"");
    assert_eq!(restoration.resolved(), 3);
}

#[cfg(feature = "serde")]
#[test]
fn test_report_serializes_as_list() {
    let map = map_of(&[(EntityCategory::Person, "Jane Doe")]);
    let restoration = restore("[PERSON_Q]", &map);

    let json = serde_json::to_value(restoration.report()).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            { "token": "[PERSON_Q]", "offset": 0, "reason": "unmapped_placeholder" }
        ])
    );
}
