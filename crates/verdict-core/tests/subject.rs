// crates/verdict-core/tests/subject.rs
// ============================================================================
// Module: Subject Tests
// Description: Tests for subject validation, typing, and canonical form.
// ============================================================================
//! ## Overview
//! Validates subject field validation, gating-type inference, and the
//! canonical serialization used for cache keys.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    missing_docs,
    reason = "Test-only panic-based assertions are permitted."
)]

use verdict_core::Subject;
use verdict_core::SubjectError;

// ============================================================================
// SECTION: Validation
// ============================================================================

#[test]
fn test_empty_subject_is_rejected() {
    let err = Subject::new(Vec::<(String, String)>::new()).unwrap_err();
    assert!(matches!(err, SubjectError::Empty));
}

#[test]
fn test_empty_field_name_is_rejected() {
    let err = Subject::new([("", "glibc-1.0-1.el7")]).unwrap_err();
    assert!(matches!(err, SubjectError::EmptyFieldName));
}

#[test]
fn test_empty_field_value_is_rejected() {
    let err = Subject::new([("item", "")]).unwrap_err();
    match err {
        SubjectError::EmptyFieldValue(field) => assert_eq!(field, "item"),
        other => panic!("unexpected error: {other}"),
    }
}

// ============================================================================
// SECTION: Gating Type
// ============================================================================

#[test]
fn test_explicit_type_field_wins() {
    let subject = Subject::new([
        ("item", "glibc-1.0-1.el7"),
        ("type", "koji_build"),
        ("productmd.compose.id", "Fedora-9000-19700101.n.18"),
    ])
    .unwrap();
    assert_eq!(subject.subject_type(), Some("koji_build"));
}

#[test]
fn test_compose_id_implies_compose_type() {
    let subject = Subject::new([("productmd.compose.id", "Fedora-9000-19700101.n.18")]).unwrap();
    assert_eq!(subject.subject_type(), Some("compose"));
}

#[test]
fn test_untypeable_subject_has_no_type() {
    let subject = Subject::new([("item", "glibc-1.0-1.el7")]).unwrap();
    assert_eq!(subject.subject_type(), None);
}

// ============================================================================
// SECTION: Canonical Form
// ============================================================================

#[test]
fn test_canonical_is_sorted_json() {
    let subject = Subject::new([("type", "koji_build"), ("item", "glibc-1.0-1.el7")]).unwrap();
    assert_eq!(subject.canonical(), r#"{"item":"glibc-1.0-1.el7","type":"koji_build"}"#);
}

#[test]
fn test_canonical_ignores_insertion_order() {
    let first = Subject::new([("item", "glibc-1.0-1.el7"), ("type", "koji_build")]).unwrap();
    let second = Subject::new([("type", "koji_build"), ("item", "glibc-1.0-1.el7")]).unwrap();
    assert_eq!(first.canonical(), second.canonical());
    assert_eq!(first, second);
}

#[test]
fn test_canonical_escapes_json_metacharacters() {
    let subject = Subject::new([("item", "a\"b\\c")]).unwrap();
    assert_eq!(subject.canonical(), r#"{"item":"a\"b\\c"}"#);
}

#[test]
fn test_serde_round_trip_preserves_fields() {
    let subject = Subject::new([("item", "glibc-1.0-1.el7"), ("type", "koji_build")]).unwrap();
    let json = serde_json::to_string(&subject).unwrap();
    let back: Subject = serde_json::from_str(&json).unwrap();
    assert_eq!(subject, back);
}
