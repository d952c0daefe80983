// crates/verdict-consumer/src/event.rs
// ============================================================================
// Module: Gating Event Parsing
// Description: Parse fact-change messages from the store message bus.
// Purpose: Project bus envelopes onto typed gating events.
// Dependencies: verdict-core, serde_json
// ============================================================================

//! ## Overview
//! The stores announce new facts on a message bus. Result messages carry
//! the store id plus a task map holding the subject fields and the test
//! case name; waiver messages carry the waiver record inline. Envelopes on
//! unrelated topics parse to `None` and are skipped; envelopes on a fact
//! topic that do not decode are an error so the consumer can log the drop.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use verdict_core::ProductVersion;
use verdict_core::ResultId;
use verdict_core::Subject;
use verdict_core::SubjectError;
use verdict_core::TestCaseName;
use verdict_core::WaiverId;

// ============================================================================
// SECTION: Envelope
// ============================================================================

/// Topic suffix announcing a new test result.
const RESULT_NEW_SUFFIX: &str = "result.new";

/// Topic suffix announcing a new waiver.
const WAIVER_NEW_SUFFIX: &str = "waiver.new";

/// Raw message-bus envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventEnvelope {
    /// Full bus topic the message arrived on.
    pub topic: String,
    /// Message body as published by the store.
    pub body: Value,
}

// ============================================================================
// SECTION: Event Errors
// ============================================================================

/// Event parsing errors.
#[derive(Debug, Error)]
pub enum EventError {
    /// The envelope arrived on a fact topic but its body does not decode.
    #[error("malformed {topic} message: {detail}")]
    Malformed {
        /// Topic the undecodable message arrived on.
        topic: String,
        /// What failed to decode.
        detail: String,
    },
}

impl EventError {
    /// Builds a malformed-message error for a topic.
    fn malformed(topic: &str, detail: impl Into<String>) -> Self {
        Self::Malformed {
            topic: topic.to_string(),
            detail: detail.into(),
        }
    }
}

// ============================================================================
// SECTION: Wire Bodies
// ============================================================================

/// Body of a result.new message.
#[derive(Debug, Deserialize)]
struct ResultNewBody {
    /// Result record stub; only the id is needed.
    result: ResultStub,
    /// Task map: subject fields plus the test case name.
    task: BTreeMap<String, String>,
}

/// Result record stub inside a result.new body.
#[derive(Debug, Deserialize)]
struct ResultStub {
    /// Store-assigned result identifier.
    id: u64,
}

/// Body of a waiver.new message.
#[derive(Debug, Deserialize)]
struct WaiverNewBody {
    /// Store-assigned waiver identifier.
    id: u64,
    /// Subject the waiver applies to.
    subject: BTreeMap<String, String>,
    /// Test case the waiver applies to.
    testcase: String,
    /// Product version the waiver applies to.
    product_version: String,
    /// Whether the requirement is waived.
    waived: bool,
}

// ============================================================================
// SECTION: Gating Events
// ============================================================================

/// Typed fact-change event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatingEvent {
    /// A new test result was stored.
    ResultNew {
        /// Store-assigned result identifier.
        result_id: ResultId,
        /// Test case the result reports on.
        testcase: TestCaseName,
        /// Subject the result was reported against.
        subject: Subject,
    },
    /// A new waiver was stored.
    WaiverNew {
        /// Store-assigned waiver identifier.
        waiver_id: WaiverId,
        /// Test case the waiver applies to.
        testcase: TestCaseName,
        /// Subject the waiver applies to.
        subject: Subject,
        /// Product version the waiver applies to.
        product_version: ProductVersion,
        /// Whether the requirement is waived.
        waived: bool,
    },
}

impl GatingEvent {
    /// Parses an envelope into a gating event.
    ///
    /// Returns `Ok(None)` for topics that do not announce facts.
    ///
    /// # Errors
    ///
    /// Returns [`EventError`] when a fact-topic body does not decode.
    pub fn from_envelope(envelope: &EventEnvelope) -> Result<Option<Self>, EventError> {
        if envelope.topic.ends_with(RESULT_NEW_SUFFIX) {
            return parse_result_new(envelope).map(Some);
        }
        if envelope.topic.ends_with(WAIVER_NEW_SUFFIX) {
            return parse_waiver_new(envelope).map(Some);
        }
        Ok(None)
    }

    /// Returns the subject the event's fact was reported against.
    #[must_use]
    pub const fn subject(&self) -> &Subject {
        match self {
            Self::ResultNew { subject, .. } | Self::WaiverNew { subject, .. } => subject,
        }
    }
}

/// Parses a result.new body.
fn parse_result_new(envelope: &EventEnvelope) -> Result<GatingEvent, EventError> {
    let body: ResultNewBody = serde_json::from_value(envelope.body.clone())
        .map_err(|err| EventError::malformed(&envelope.topic, err.to_string()))?;

    // The task map mixes the test case name with the subject fields.
    let mut fields = body.task;
    let name = fields
        .remove("name")
        .ok_or_else(|| EventError::malformed(&envelope.topic, "task has no test case name"))?;
    let subject = subject_from_fields(&envelope.topic, fields)?;

    Ok(GatingEvent::ResultNew {
        result_id: ResultId::new(body.result.id),
        testcase: TestCaseName::new(name),
        subject,
    })
}

/// Parses a waiver.new body.
fn parse_waiver_new(envelope: &EventEnvelope) -> Result<GatingEvent, EventError> {
    let body: WaiverNewBody = serde_json::from_value(envelope.body.clone())
        .map_err(|err| EventError::malformed(&envelope.topic, err.to_string()))?;
    let subject = subject_from_fields(&envelope.topic, body.subject)?;

    Ok(GatingEvent::WaiverNew {
        waiver_id: WaiverId::new(body.id),
        testcase: TestCaseName::new(body.testcase),
        subject,
        product_version: ProductVersion::new(body.product_version),
        waived: body.waived,
    })
}

/// Builds a subject from message fields, mapping validation failures.
fn subject_from_fields(
    topic: &str,
    fields: BTreeMap<String, String>,
) -> Result<Subject, EventError> {
    Subject::new(fields).map_err(|err: SubjectError| EventError::malformed(topic, err.to_string()))
}
