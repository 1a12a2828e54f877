//! Redact-then-restore behavior through the public API.
//!
//! These tests cover exact reconstruction, the no-leak guarantee, and
//! placeholder reuse for repeated values.

use placeholder_redaction::{redact, restore, EntityCategory, EntitySpan, SkipReason};

fn span_of(text: &str, category: EntityCategory, needle: &str) -> EntitySpan {
    let start = text.find(needle).expect("needle present in text");
    EntitySpan::from_source(text, category, start, start + needle.len(), 0.9)
        .expect("needle is a valid slice")
}

/// Every capitalized word is a person; enough to exercise the engine.
fn capitalized_words(text: &str) -> Vec<EntitySpan> {
    let mut spans = Vec::new();
    let mut offset = 0;
    for word in text.split(' ') {
        let trimmed = word.trim_end_matches(|c: char| !c.is_alphanumeric());
        if trimmed.chars().next().is_some_and(char::is_uppercase) {
            spans.push(EntitySpan::new(
                EntityCategory::Person,
                offset,
                offset + trimmed.len(),
                trimmed,
                0.9,
            ));
        }
        offset += word.len() + 1;
    }
    spans
}

#[test]
fn test_speaker_announcement() {
    let text = "Dr. Evelyn Reed will present on May 20, 2024. Contact: e.reed@science-corp.net";
    let spans = vec![
        span_of(text, EntityCategory::Person, "Evelyn Reed"),
        span_of(text, EntityCategory::Date, "May 20, 2024"),
        span_of(text, EntityCategory::Email, "e.reed@science-corp.net"),
    ];

    let redaction = redact(text, &spans).unwrap();
    assert_eq!(
        redaction.text(),
        "Dr. [PERSON_A] will present on [DATE_A]. Contact: [EMAIL_A]"
    );
    assert_eq!(redaction.map().len(), 3);
    assert!(redaction.skipped().is_empty());

    let response = "Reminder: [PERSON_A] presents on [DATE_A]; RSVP to [EMAIL_A].";
    let restoration = restore(response, redaction.map());
    assert_eq!(
        restoration.text(),
        "Reminder: Evelyn Reed presents on May 20, 2024; RSVP to e.reed@science-corp.net."
    );
    assert_eq!(restoration.resolved(), 3);
    assert!(restoration.report().is_empty());
    assert!(restoration.missing().is_empty());
}

#[test]
fn test_round_trip_reconstructs_input() {
    let texts = [
        "Alice met Bob in Paris.",
        "Bob, Alice and Bob again",
        "nothing to see here",
        "Zoë and Łukasz met José.",
        "",
    ];
    for text in texts {
        let redaction = redact(text, &capitalized_words(text)).unwrap();
        let restoration = restore(redaction.text(), redaction.map());
        assert_eq!(restoration.text(), text, "round trip of {text:?}");
        assert!(restoration.report().is_empty());
    }
}

#[test]
fn test_no_original_value_survives() {
    let text = "Alice met Bob in Paris. Later Alice called Paris.";
    let redaction = redact(text, &capitalized_words(text)).unwrap();
    for entry in redaction.map() {
        assert!(
            !redaction.text().contains(entry.original()),
            "{} leaked",
            entry.token()
        );
    }
}

#[test]
fn test_uncovered_repeat_is_swept() {
    // The detector only reported the first mention.
    let text = "Jane called. Jane left.";
    let spans = vec![EntitySpan::new(EntityCategory::Person, 0, 4, "Jane", 0.9)];

    let redaction = redact(text, &spans).unwrap();
    assert_eq!(redaction.text(), "[PERSON_A] called. [PERSON_A] left.");
    assert_eq!(redaction.audit().swept_occurrences, 1);
    assert_eq!(redaction.audit().replacements[&EntityCategory::Person], 2);
}

#[test]
fn test_repeated_values_share_a_placeholder() {
    let text = "Jane met Jane and Bob.";
    let redaction = redact(text, &capitalized_words(text)).unwrap();

    assert_eq!(redaction.text(), "[PERSON_A] met [PERSON_A] and [PERSON_B].");
    assert_eq!(redaction.map().len(), 2);
    assert_eq!(redaction.audit().placeholders[&EntityCategory::Person], 2);
}

#[test]
fn test_same_value_in_different_categories() {
    let text = "Jordan flew to Jordan.";
    let spans = vec![
        EntitySpan::new(EntityCategory::Person, 0, 6, "Jordan", 0.9),
        EntitySpan::new(EntityCategory::Location, 15, 21, "Jordan", 0.9),
    ];

    let redaction = redact(text, &spans).unwrap();
    assert_eq!(redaction.text(), "[PERSON_A] flew to [LOCATION_A].");
    assert_eq!(restore(redaction.text(), redaction.map()).text(), text);
}

#[test]
fn test_overlap_is_resolved_deterministically() {
    let text = "Jane Smith Corp. signed the lease.";
    let spans = vec![
        EntitySpan::new(EntityCategory::Person, 0, 10, "Jane Smith", 0.9),
        EntitySpan::new(EntityCategory::Org, 0, 15, "Jane Smith Corp", 0.5),
    ];

    for _ in 0..20 {
        let redaction = redact(text, &spans).unwrap();
        assert_eq!(redaction.text(), "[ORG_A]. signed the lease.");
        assert_eq!(redaction.skipped()[0].reason, SkipReason::Overlap);
        assert_eq!(redaction.audit().discarded_overlaps, 1);
    }
}

#[test]
fn test_literal_token_in_source_is_preserved() {
    let text = "Paste [PERSON_A] here, signed Jane";
    let spans = vec![span_of(text, EntityCategory::Person, "Jane")];

    let redaction = redact(text, &spans).unwrap();
    assert_eq!(redaction.text(), "Paste [PERSON_A] here, signed [PERSON_B]");

    let restoration = restore(redaction.text(), redaction.map());
    assert_eq!(restoration.text(), text);
    assert_eq!(restoration.report().unmapped(), 1);
}

#[test]
fn test_custom_categories_round_trip() {
    let iban = EntityCategory::custom("IBAN").unwrap();
    let text = "Wire to DE89370400440532013000 today.";
    let spans = vec![span_of(text, iban, "DE89370400440532013000")];

    let redaction = redact(text, &spans).unwrap();
    assert_eq!(redaction.text(), "Wire to [IBAN_A] today.");

    let restoration = restore("Sent to [IBAN_A].", redaction.map());
    assert_eq!(restoration.text(), "Sent to DE89370400440532013000.");
}
