// crates/verdict-consumer/tests/consumer.rs
// ============================================================================
// Module: Consumer Loop Tests
// Description: Tests for the envelope-draining consumer loop.
// Purpose: Ensure the loop survives bad input and stops on channel close.
// Dependencies: verdict-consumer, verdict-core, tokio, serde_json
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    missing_docs,
    reason = "Test-only panic-based assertions are permitted."
)]

use std::thread;

use serde_json::json;
use tokio::sync::mpsc;
use verdict_consumer::ChangeDetector;
use verdict_consumer::ChannelSink;
use verdict_consumer::DecisionUpdate;
use verdict_consumer::EventEnvelope;
use verdict_consumer::run_blocking;
use verdict_core::DecisionContext;
use verdict_core::DecisionEngine;
use verdict_core::EngineConfig;
use verdict_core::InMemoryFactResolver;
use verdict_core::NullCache;
use verdict_core::Outcome;
use verdict_core::Policy;
use verdict_core::PolicyId;
use verdict_core::ProductVersion;
use verdict_core::RequiredTestCase;
use verdict_core::ResultId;
use verdict_core::Subject;
use verdict_core::TestCaseName;
use verdict_core::TestResult;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Shared koji_build subject used across the tests.
fn subject() -> Subject {
    Subject::new([("item", "glibc-1.0-1.el7"), ("type", "koji_build")]).unwrap()
}

/// Uncached single-policy engine over a fresh in-memory store.
fn engine() -> DecisionEngine<InMemoryFactResolver, NullCache> {
    let policy = Policy {
        id: PolicyId::from("errata_rule"),
        decision_context: DecisionContext::from("errata_newfile_to_qe"),
        product_versions: [ProductVersion::from("rhel-7")].into_iter().collect(),
        subject_type: "koji_build".to_string(),
        rules: vec![RequiredTestCase::new("dist.rpmdeplint")],
    };
    DecisionEngine::new(vec![policy], InMemoryFactResolver::new(), NullCache::new(), EngineConfig::default())
}

/// Well-formed result.new envelope for the fixture subject.
fn result_envelope(id: u64) -> EventEnvelope {
    EventEnvelope {
        topic: "taskotron.result.new".to_string(),
        body: json!({
            "result": {"id": id},
            "task": {
                "item": "glibc-1.0-1.el7",
                "type": "koji_build",
                "name": "dist.rpmdeplint"
            }
        }),
    }
}

// ============================================================================
// SECTION: Loop Behavior
// ============================================================================

#[test]
fn test_loop_survives_bad_input_and_stops_on_close() {
    let engine = engine();
    engine.resolver().push_result(TestResult {
        id: ResultId::new(1),
        testcase: TestCaseName::from("dist.rpmdeplint"),
        outcome: Outcome::Failed,
        scenario: None,
        subject: subject(),
    });

    let (update_tx, mut updates) = mpsc::channel::<DecisionUpdate>(16);
    let detector = ChangeDetector::new(engine, ChannelSink::new(update_tx));

    let (envelope_tx, envelope_rx) = mpsc::channel::<EventEnvelope>(16);
    let worker = thread::spawn(move || run_blocking(&detector, envelope_rx));

    // Unrelated topic, then a malformed fact message, then a real event.
    envelope_tx
        .blocking_send(EventEnvelope {
            topic: "buildsys.build.state.change".to_string(),
            body: json!({}),
        })
        .unwrap();
    envelope_tx
        .blocking_send(EventEnvelope {
            topic: "taskotron.result.new".to_string(),
            body: json!({"garbage": true}),
        })
        .unwrap();
    envelope_tx.blocking_send(result_envelope(1)).unwrap();
    drop(envelope_tx);

    worker.join().unwrap();

    let update = updates.blocking_recv().unwrap();
    assert!(!update.decision.policies_satisfied);
    assert!(updates.try_recv().is_err());
}
