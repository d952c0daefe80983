// crates/verdict-consumer/src/sink/mod.rs
// ============================================================================
// Module: Decision Update Sinks
// Description: Outbound publication of decision-change notifications.
// Purpose: Define the sink contract and the built-in sink implementations.
// Dependencies: verdict-core, serde
// ============================================================================

//! ## Overview
//! When the change detector observes a changed decision it publishes a
//! decision.update notification through a sink. The sink contract is
//! synchronous and infallible delivery is not assumed; a failed publish
//! surfaces as an error so the consumer can log it. Two sinks ship here: a
//! channel sink for in-process subscribers and a log sink writing one JSON
//! line per update.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod channel;
pub mod log;

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;
use verdict_core::Decision;

pub use self::channel::ChannelSink;
pub use self::log::LogSink;

// ============================================================================
// SECTION: Sink Contract
// ============================================================================

/// Topic decision-change notifications are published on.
pub const DECISION_UPDATE_TOPIC: &str = "decision.update";

/// Publication errors.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The sink rejected or could not deliver the update.
    #[error("decision update publish failed: {0}")]
    Sink(String),
}

/// One published decision-change notification.
///
/// # Invariants
/// - `decision.previous` carries the pre-event decision the change was
///   detected against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionUpdate {
    /// Publication topic.
    pub topic: String,
    /// Changed decision, with its previous outcome attached.
    pub decision: Decision,
}

impl DecisionUpdate {
    /// Wraps a changed decision in an update on the standard topic.
    #[must_use]
    pub fn new(decision: Decision) -> Self {
        Self {
            topic: DECISION_UPDATE_TOPIC.to_string(),
            decision,
        }
    }
}

/// Outbound sink for decision-change notifications.
pub trait DecisionSink: Send + Sync {
    /// Publishes one decision update.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] when the update cannot be delivered.
    fn publish(&self, update: DecisionUpdate) -> Result<(), PublishError>;
}
