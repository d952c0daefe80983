// crates/verdict-resolve/tests/http_resolver.rs
// ============================================================================
// Module: HTTP Resolver Tests
// Description: Tests for the HTTP-backed fact resolver.
// Purpose: Validate query construction, pagination, projection, and error
//          mapping against a local stub store.
// Dependencies: verdict-resolve, verdict-core, tiny_http
// ============================================================================

//! ## Overview
//! Runs the resolver against a local stub server and validates:
//! - Result and waiver projection onto the core fact types
//! - Pagination via `next` links with the page budget enforced
//! - Exclusion-set filtering
//! - Error mapping for unreachable stores and undecodable responses

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    missing_docs,
    reason = "Test-only panic-based assertions are permitted."
)]

use std::collections::BTreeSet;
use std::thread;
use std::time::Duration;

use tiny_http::Response;
use tiny_http::Server;
use verdict_core::FactResolver;
use verdict_core::Outcome;
use verdict_core::ProductVersion;
use verdict_core::ResolveError;
use verdict_core::ResultId;
use verdict_core::Subject;
use verdict_core::WaiverId;
use verdict_resolve::HttpFactResolver;
use verdict_resolve::HttpResolverConfig;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

/// Shared koji_build subject used across the tests.
fn subject() -> Subject {
    Subject::new([("item", "glibc-1.0-1.el7"), ("type", "koji_build")]).unwrap()
}

/// Spawns a stub store answering each request with the next body in order.
fn spawn_store(bodies: Vec<String>) -> (String, thread::JoinHandle<Vec<String>>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let url = format!("http://{addr}");

    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for body in bodies {
            let Ok(request) = server.recv() else {
                break;
            };
            seen.push(request.url().to_string());
            let response = Response::from_string(body)
                .with_header("Content-Type: application/json".parse::<tiny_http::Header>().unwrap());
            let _ = request.respond(response);
        }
        seen
    });

    (url, handle)
}

/// Builds a resolver pointed at the stub store endpoints.
fn resolver(results_url: &str, waivers_url: &str) -> HttpFactResolver {
    HttpFactResolver::new(HttpResolverConfig {
        results_url: results_url.to_string(),
        waivers_url: waivers_url.to_string(),
        ..HttpResolverConfig::default()
    })
    .unwrap()
}

// ============================================================================
// SECTION: Result Fetching
// ============================================================================

#[test]
fn test_results_are_projected_from_store_records() {
    let body = r#"{
        "data": [
            {"id": 123, "outcome": "PASSED", "testcase": {"name": "dist.rpmdeplint"},
             "data": {"scenario": ["fedora.universal.x86_64"], "item": ["glibc-1.0-1.el7"]}},
            {"id": 124, "outcome": "NEEDS_INSPECTION", "testcase": {"name": "dist.abicheck"}}
        ],
        "next": null
    }"#;
    let (url, handle) = spawn_store(vec![body.to_string()]);

    let resolver = resolver(&format!("{url}/results"), &format!("{url}/waivers"));
    let results = resolver.fetch_results(&subject(), &BTreeSet::new()).unwrap();
    let seen = handle.join().unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, ResultId::new(123));
    assert_eq!(results[0].testcase.as_str(), "dist.rpmdeplint");
    assert_eq!(results[0].outcome, Outcome::Passed);
    assert_eq!(results[0].scenario.as_deref(), Some("fedora.universal.x86_64"));
    assert_eq!(results[0].subject, subject());
    assert_eq!(results[1].outcome, Outcome::Other("NEEDS_INSPECTION".to_string()));
    assert_eq!(results[1].scenario, None);

    // Subject fields travel as query parameters.
    assert_eq!(seen.len(), 1);
    assert!(seen[0].contains("item=glibc-1.0-1.el7"));
    assert!(seen[0].contains("type=koji_build"));
}

#[test]
fn test_results_pagination_follows_next_links() {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let base = format!("http://{addr}");

    let first = format!(
        r#"{{"data": [{{"id": 1, "outcome": "PASSED", "testcase": {{"name": "a"}}}}],
            "next": "{base}/results?page=1"}}"#
    );
    let second = r#"{"data": [{"id": 2, "outcome": "FAILED", "testcase": {"name": "b"}}], "next": null}"#
        .to_string();

    let handle = thread::spawn(move || {
        for body in [first, second] {
            let Ok(request) = server.recv() else {
                break;
            };
            let _ = request.respond(Response::from_string(body));
        }
    });

    let resolver = resolver(&format!("{base}/results"), &format!("{base}/waivers"));
    let results = resolver.fetch_results(&subject(), &BTreeSet::new()).unwrap();
    handle.join().unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, ResultId::new(1));
    assert_eq!(results[1].id, ResultId::new(2));
}

#[test]
fn test_pagination_budget_is_enforced() {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let base = format!("http://{addr}");

    // Every page points at another page; the resolver must give up.
    let looping = format!(
        r#"{{"data": [{{"id": 1, "outcome": "PASSED", "testcase": {{"name": "a"}}}}],
            "next": "{base}/results?again=true"}}"#
    );
    let handle = thread::spawn(move || {
        for _ in 0..4 {
            let Ok(Some(request)) = server.recv_timeout(Duration::from_secs(5)) else {
                break;
            };
            let _ = request.respond(Response::from_string(looping.clone()));
        }
    });

    let resolver = HttpFactResolver::new(HttpResolverConfig {
        results_url: format!("{base}/results"),
        waivers_url: format!("{base}/waivers"),
        max_pages: 3,
        ..HttpResolverConfig::default()
    })
    .unwrap();

    let err = resolver.fetch_results(&subject(), &BTreeSet::new()).unwrap_err();
    assert!(matches!(err, ResolveError::InvalidResponse(_)));
    handle.join().unwrap();
}

#[test]
fn test_excluded_result_ids_are_filtered() {
    let body = r#"{
        "data": [
            {"id": 1, "outcome": "PASSED", "testcase": {"name": "a"}},
            {"id": 2, "outcome": "FAILED", "testcase": {"name": "b"}}
        ],
        "next": null
    }"#;
    let (url, handle) = spawn_store(vec![body.to_string()]);

    let resolver = resolver(&format!("{url}/results"), &format!("{url}/waivers"));
    let exclude: BTreeSet<ResultId> = [ResultId::new(2)].into_iter().collect();
    let results = resolver.fetch_results(&subject(), &exclude).unwrap();
    handle.join().unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, ResultId::new(1));
}

// ============================================================================
// SECTION: Waiver Fetching
// ============================================================================

#[test]
fn test_waivers_are_projected_from_store_records() {
    let body = r#"{
        "data": [
            {"id": 7, "subject": {"item": "glibc-1.0-1.el7", "type": "koji_build"},
             "testcase": "dist.rpmdeplint", "product_version": "rhel-7", "waived": true}
        ],
        "next": null
    }"#;
    let (url, handle) = spawn_store(vec![body.to_string()]);

    let resolver = resolver(&format!("{url}/results"), &format!("{url}/waivers"));
    let waivers = resolver
        .fetch_waivers(&subject(), &ProductVersion::from("rhel-7"), &BTreeSet::new())
        .unwrap();
    let seen = handle.join().unwrap();

    assert_eq!(waivers.len(), 1);
    assert_eq!(waivers[0].id, WaiverId::new(7));
    assert_eq!(waivers[0].subject, subject());
    assert_eq!(waivers[0].testcase.as_str(), "dist.rpmdeplint");
    assert!(waivers[0].waived);

    assert_eq!(seen.len(), 1);
    assert!(seen[0].contains("product_version=rhel-7"));
}

#[test]
fn test_excluded_waiver_ids_are_filtered() {
    let body = r#"{
        "data": [
            {"id": 7, "subject": {"item": "glibc-1.0-1.el7", "type": "koji_build"},
             "testcase": "dist.rpmdeplint", "product_version": "rhel-7", "waived": true},
            {"id": 8, "subject": {"item": "glibc-1.0-1.el7", "type": "koji_build"},
             "testcase": "dist.abicheck", "product_version": "rhel-7", "waived": true}
        ],
        "next": null
    }"#;
    let (url, handle) = spawn_store(vec![body.to_string()]);

    let resolver = resolver(&format!("{url}/results"), &format!("{url}/waivers"));
    let exclude: BTreeSet<WaiverId> = [WaiverId::new(8)].into_iter().collect();
    let waivers = resolver
        .fetch_waivers(&subject(), &ProductVersion::from("rhel-7"), &exclude)
        .unwrap();
    handle.join().unwrap();

    assert_eq!(waivers.len(), 1);
    assert_eq!(waivers[0].id, WaiverId::new(7));
}

// ============================================================================
// SECTION: Error Mapping
// ============================================================================

#[test]
fn test_unreachable_store_maps_to_upstream_unavailable() {
    // Port 9 is the discard service; nothing listens there in test.
    let resolver = resolver("http://127.0.0.1:9/results", "http://127.0.0.1:9/waivers");
    let err = resolver.fetch_results(&subject(), &BTreeSet::new()).unwrap_err();
    assert!(matches!(err, ResolveError::UpstreamUnavailable(_)));
}

#[test]
fn test_error_status_maps_to_upstream_unavailable() {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let base = format!("http://{addr}");
    let handle = thread::spawn(move || {
        if let Ok(request) = server.recv() {
            let _ = request.respond(Response::from_string("busy").with_status_code(503));
        }
    });

    let resolver = resolver(&format!("{base}/results"), &format!("{base}/waivers"));
    let err = resolver.fetch_results(&subject(), &BTreeSet::new()).unwrap_err();
    assert!(matches!(err, ResolveError::UpstreamUnavailable(_)));
    handle.join().unwrap();
}

#[test]
fn test_undecodable_body_maps_to_invalid_response() {
    let (url, handle) = spawn_store(vec!["not json".to_string()]);

    let resolver = resolver(&format!("{url}/results"), &format!("{url}/waivers"));
    let err = resolver.fetch_results(&subject(), &BTreeSet::new()).unwrap_err();
    assert!(matches!(err, ResolveError::InvalidResponse(_)));
    handle.join().unwrap();
}

#[test]
fn test_invalid_endpoint_is_a_configuration_error() {
    let err = HttpFactResolver::new(HttpResolverConfig {
        results_url: "ftp://example.invalid/results".to_string(),
        ..HttpResolverConfig::default()
    })
    .unwrap_err();
    assert!(matches!(err, ResolveError::Configuration(_)));
}
