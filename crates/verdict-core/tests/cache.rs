// crates/verdict-core/tests/cache.rs
// ============================================================================
// Module: Fact Cache Tests
// Description: Tests for cache-key derivation and the in-memory backend.
// Purpose: Ensure keys are canonical and invalidation is targeted.
// Dependencies: verdict-core
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    missing_docs,
    reason = "Test-only panic-based assertions are permitted."
)]

use std::time::Duration;

use verdict_core::CacheBackend;
use verdict_core::MemoryCache;
use verdict_core::NullCache;
use verdict_core::ProductVersion;
use verdict_core::Subject;
use verdict_core::results_cache_key;
use verdict_core::waivers_cache_key;

// ============================================================================
// SECTION: Key Derivation
// ============================================================================

#[test]
fn test_results_key_embeds_canonical_subject() {
    let subject = Subject::new([("type", "koji_build"), ("item", "glibc-1.0-1.el7")]).unwrap();
    assert_eq!(
        results_cache_key(&subject),
        r#"verdict.resolve:retrieve_results|{"item":"glibc-1.0-1.el7","type":"koji_build"}"#
    );
}

#[test]
fn test_waivers_key_embeds_product_version() {
    let subject = Subject::new([("item", "glibc-1.0-1.el7"), ("type", "koji_build")]).unwrap();
    assert_eq!(
        waivers_cache_key(&subject, &ProductVersion::from("rhel-7")),
        r#"verdict.resolve:retrieve_waivers|rhel-7|{"item":"glibc-1.0-1.el7","type":"koji_build"}"#
    );
}

#[test]
fn test_keys_are_identical_regardless_of_field_order() {
    let first = Subject::new([("item", "glibc-1.0-1.el7"), ("type", "koji_build")]).unwrap();
    let second = Subject::new([("type", "koji_build"), ("item", "glibc-1.0-1.el7")]).unwrap();
    assert_eq!(results_cache_key(&first), results_cache_key(&second));
}

#[test]
fn test_distinct_subjects_get_distinct_keys() {
    let first = Subject::new([("item", "glibc-1.0-1.el7"), ("type", "koji_build")]).unwrap();
    let second = Subject::new([("item", "bash-4.4-1.el7"), ("type", "koji_build")]).unwrap();
    assert_ne!(results_cache_key(&first), results_cache_key(&second));
}

// ============================================================================
// SECTION: In-Memory Backend
// ============================================================================

#[test]
fn test_set_then_get_returns_the_value() {
    let cache = MemoryCache::new();
    cache.set("key", b"value", Duration::from_secs(60)).unwrap();
    assert_eq!(cache.get("key").unwrap(), Some(b"value".to_vec()));
}

#[test]
fn test_expired_entries_are_not_returned() {
    let cache = MemoryCache::new();
    cache.set("key", b"value", Duration::ZERO).unwrap();
    assert_eq!(cache.get("key").unwrap(), None);
}

#[test]
fn test_delete_is_targeted() {
    let cache = MemoryCache::new();
    cache.set("keep", b"a", Duration::from_secs(60)).unwrap();
    cache.set("drop", b"b", Duration::from_secs(60)).unwrap();
    cache.delete("drop").unwrap();
    assert_eq!(cache.get("keep").unwrap(), Some(b"a".to_vec()));
    assert_eq!(cache.get("drop").unwrap(), None);
}

#[test]
fn test_delete_of_missing_key_is_a_no_op() {
    let cache = MemoryCache::new();
    cache.delete("missing").unwrap();
    assert_eq!(cache.get("missing").unwrap(), None);
}

#[test]
fn test_overwrite_replaces_the_value() {
    let cache = MemoryCache::new();
    cache.set("key", b"old", Duration::from_secs(60)).unwrap();
    cache.set("key", b"new", Duration::from_secs(60)).unwrap();
    assert_eq!(cache.get("key").unwrap(), Some(b"new".to_vec()));
}

// ============================================================================
// SECTION: Null Backend
// ============================================================================

#[test]
fn test_null_cache_never_stores() {
    let cache = NullCache::new();
    cache.set("key", b"value", Duration::from_secs(60)).unwrap();
    assert_eq!(cache.get("key").unwrap(), None);
    cache.delete("key").unwrap();
}
