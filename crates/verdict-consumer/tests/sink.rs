// crates/verdict-consumer/tests/sink.rs
// ============================================================================
// Module: Decision Sink Tests
// Description: Tests for the channel and log sinks.
// Purpose: Ensure delivery failures surface and log lines are well-formed.
// Dependencies: verdict-consumer, verdict-core, tokio, serde_json
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    missing_docs,
    reason = "Test-only panic-based assertions are permitted."
)]

use serde_json::Value;
use tokio::sync::mpsc;
use verdict_consumer::ChannelSink;
use verdict_consumer::DECISION_UPDATE_TOPIC;
use verdict_consumer::DecisionSink;
use verdict_consumer::DecisionUpdate;
use verdict_consumer::LogSink;
use verdict_core::Decision;
use verdict_core::DecisionContext;
use verdict_core::ProductVersion;
use verdict_core::Subject;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Vacuous-decision update used as the publish payload.
fn update() -> DecisionUpdate {
    DecisionUpdate::new(Decision::vacuous(
        Subject::new([("item", "glibc-1.0-1.el7"), ("type", "koji_build")]).unwrap(),
        DecisionContext::from("errata_newfile_to_qe"),
        ProductVersion::from("rhel-7"),
    ))
}

// ============================================================================
// SECTION: Channel Sink
// ============================================================================

#[test]
fn test_channel_sink_delivers_updates() {
    let (sender, mut receiver) = mpsc::channel(4);
    let sink = ChannelSink::new(sender);

    sink.publish(update()).unwrap();
    let delivered = receiver.try_recv().unwrap();
    assert_eq!(delivered.topic, DECISION_UPDATE_TOPIC);
}

#[test]
fn test_channel_sink_fails_when_subscriber_is_gone() {
    let (sender, receiver) = mpsc::channel(4);
    drop(receiver);
    let sink = ChannelSink::new(sender);

    assert!(sink.publish(update()).is_err());
}

#[test]
fn test_channel_sink_fails_instead_of_blocking_when_full() {
    let (sender, _receiver) = mpsc::channel(1);
    let sink = ChannelSink::new(sender);

    sink.publish(update()).unwrap();
    assert!(sink.publish(update()).is_err());
}

// ============================================================================
// SECTION: Log Sink
// ============================================================================

#[test]
fn test_log_sink_writes_one_json_line_per_update() {
    let sink = LogSink::new(Vec::new());
    sink.publish(update()).unwrap();
    sink.publish(update()).unwrap();

    let written = sink.into_inner().unwrap();
    let text = String::from_utf8(written).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);

    let parsed: Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(parsed["topic"], DECISION_UPDATE_TOPIC);
    assert_eq!(parsed["decision"]["policies_satisfied"], Value::Bool(true));
    assert!(parsed["timestamp"].as_str().unwrap().contains('T'));
    // Suppressed-change bookkeeping never leaks: a vacuous decision has no
    // previous attached and the field is omitted entirely.
    assert!(parsed["decision"].get("previous").is_none());
}
