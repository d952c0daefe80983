// crates/verdict-consumer/src/lib.rs
// ============================================================================
// Module: Verdict Consumer Library
// Description: Event-driven decision change detection.
// Purpose: Expose event parsing, the change detector, sinks, and the loop.
// Dependencies: crate::{consumer, detector, event, sink}
// ============================================================================

//! ## Overview
//! Verdict consumer listens for fact-change messages from the result and
//! waiver stores and publishes decision.update notifications whenever a
//! new fact changes the observable outcome of a gating decision. Detection
//! compares a fresh decision against the pre-event state reconstructed by
//! excluding the new fact, so redelivered events and no-op facts publish
//! nothing.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod consumer;
pub mod detector;
pub mod event;
pub mod sink;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use consumer::run_blocking;
pub use detector::ChangeDetector;
pub use detector::DetectorError;
pub use event::EventEnvelope;
pub use event::EventError;
pub use event::GatingEvent;
pub use sink::ChannelSink;
pub use sink::DECISION_UPDATE_TOPIC;
pub use sink::DecisionSink;
pub use sink::DecisionUpdate;
pub use sink::LogSink;
