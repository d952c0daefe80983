// crates/verdict-consumer/tests/event.rs
// ============================================================================
// Module: Gating Event Tests
// Description: Tests for message-bus envelope parsing.
// Purpose: Ensure fact topics decode, unrelated topics skip, and malformed
//          bodies error.
// Dependencies: verdict-consumer, verdict-core, serde_json
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    missing_docs,
    reason = "Test-only panic-based assertions are permitted."
)]

use serde_json::json;
use verdict_consumer::EventEnvelope;
use verdict_consumer::EventError;
use verdict_consumer::GatingEvent;
use verdict_core::ProductVersion;
use verdict_core::ResultId;
use verdict_core::Subject;
use verdict_core::WaiverId;

// ============================================================================
// SECTION: Result Messages
// ============================================================================

#[test]
fn test_result_new_parses_task_into_subject_and_testcase() {
    let envelope = EventEnvelope {
        topic: "org.fedoraproject.prod.taskotron.result.new".to_string(),
        body: json!({
            "result": {"id": 123},
            "task": {
                "item": "glibc-1.0-1.el7",
                "type": "koji_build",
                "name": "dist.rpmdeplint"
            }
        }),
    };

    let event = GatingEvent::from_envelope(&envelope).unwrap().unwrap();
    match event {
        GatingEvent::ResultNew {
            result_id,
            testcase,
            subject,
        } => {
            assert_eq!(result_id, ResultId::new(123));
            assert_eq!(testcase.as_str(), "dist.rpmdeplint");
            assert_eq!(
                subject,
                Subject::new([("item", "glibc-1.0-1.el7"), ("type", "koji_build")]).unwrap()
            );
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn test_result_new_with_compose_task_types_as_compose() {
    let envelope = EventEnvelope {
        topic: "taskotron.result.new".to_string(),
        body: json!({
            "result": {"id": 77},
            "task": {
                "productmd.compose.id": "Fedora-9000-19700101.n.18",
                "name": "compose.install_no_user"
            }
        }),
    };

    let event = GatingEvent::from_envelope(&envelope).unwrap().unwrap();
    assert_eq!(event.subject().subject_type(), Some("compose"));
}

#[test]
fn test_result_new_without_task_name_is_malformed() {
    let envelope = EventEnvelope {
        topic: "taskotron.result.new".to_string(),
        body: json!({
            "result": {"id": 1},
            "task": {"item": "glibc-1.0-1.el7", "type": "koji_build"}
        }),
    };

    let err = GatingEvent::from_envelope(&envelope).unwrap_err();
    assert!(matches!(err, EventError::Malformed { .. }));
}

#[test]
fn test_result_new_with_undecodable_body_is_malformed() {
    let envelope = EventEnvelope {
        topic: "taskotron.result.new".to_string(),
        body: json!({"result": "not an object"}),
    };

    let err = GatingEvent::from_envelope(&envelope).unwrap_err();
    assert!(matches!(err, EventError::Malformed { .. }));
}

// ============================================================================
// SECTION: Waiver Messages
// ============================================================================

#[test]
fn test_waiver_new_parses_record_fields() {
    let envelope = EventEnvelope {
        topic: "org.fedoraproject.prod.waiver.new".to_string(),
        body: json!({
            "id": 15,
            "subject": {"item": "glibc-1.0-1.el7", "type": "koji_build"},
            "testcase": "dist.abicheck",
            "product_version": "rhel-7",
            "waived": true
        }),
    };

    let event = GatingEvent::from_envelope(&envelope).unwrap().unwrap();
    match event {
        GatingEvent::WaiverNew {
            waiver_id,
            testcase,
            subject,
            product_version,
            waived,
        } => {
            assert_eq!(waiver_id, WaiverId::new(15));
            assert_eq!(testcase.as_str(), "dist.abicheck");
            assert_eq!(subject.subject_type(), Some("koji_build"));
            assert_eq!(product_version, ProductVersion::from("rhel-7"));
            assert!(waived);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn test_waiver_new_with_empty_subject_is_malformed() {
    let envelope = EventEnvelope {
        topic: "waiver.new".to_string(),
        body: json!({
            "id": 15,
            "subject": {},
            "testcase": "dist.abicheck",
            "product_version": "rhel-7",
            "waived": true
        }),
    };

    let err = GatingEvent::from_envelope(&envelope).unwrap_err();
    assert!(matches!(err, EventError::Malformed { .. }));
}

// ============================================================================
// SECTION: Unrelated Topics
// ============================================================================

#[test]
fn test_unrelated_topics_are_skipped() {
    for topic in ["buildsys.build.state.change", "waiver.update", "result.deleted"] {
        let envelope = EventEnvelope {
            topic: topic.to_string(),
            body: json!({}),
        };
        assert!(GatingEvent::from_envelope(&envelope).unwrap().is_none(), "topic {topic}");
    }
}
