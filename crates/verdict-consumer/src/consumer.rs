// crates/verdict-consumer/src/consumer.rs
// ============================================================================
// Module: Event Consumer Loop
// Description: Drain bus envelopes and drive the change detector.
// Purpose: Keep consuming across malformed messages and handling failures.
// Dependencies: verdict-core, tokio, crate::{detector, event, sink}
// ============================================================================

//! ## Overview
//! The consumer loop drains envelopes from a bounded channel and feeds the
//! change detector. The loop never dies on bad input: unrelated topics are
//! skipped, malformed fact messages are logged and dropped, and detector
//! failures are logged so the next event still gets handled. The loop ends
//! when the envelope channel closes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tokio::sync::mpsc;
use tracing::debug;
use tracing::error;
use tracing::warn;
use verdict_core::CacheBackend;
use verdict_core::FactResolver;

use crate::detector::ChangeDetector;
use crate::event::EventEnvelope;
use crate::event::GatingEvent;
use crate::sink::DecisionSink;

// ============================================================================
// SECTION: Consumer Loop
// ============================================================================

/// Drains the envelope channel until it closes.
///
/// Runs on a dedicated thread; decisions block on store fetches, so the
/// loop deliberately stays off the async runtime.
pub fn run_blocking<R, C, S>(
    detector: &ChangeDetector<R, C, S>,
    mut envelopes: mpsc::Receiver<EventEnvelope>,
) where
    R: FactResolver,
    C: CacheBackend,
    S: DecisionSink,
{
    while let Some(envelope) = envelopes.blocking_recv() {
        process_envelope(detector, &envelope);
    }
    debug!("envelope channel closed; consumer stopping");
}

/// Processes one envelope, logging instead of propagating failures.
fn process_envelope<R, C, S>(detector: &ChangeDetector<R, C, S>, envelope: &EventEnvelope)
where
    R: FactResolver,
    C: CacheBackend,
    S: DecisionSink,
{
    let event = match GatingEvent::from_envelope(envelope) {
        Ok(Some(event)) => event,
        Ok(None) => {
            debug!(topic = %envelope.topic, "skipping unrelated topic");
            return;
        }
        Err(err) => {
            warn!(topic = %envelope.topic, error = %err, "dropping malformed message");
            return;
        }
    };

    match detector.handle_event(&event) {
        Ok(published) => {
            debug!(topic = %envelope.topic, published, "event handled");
        }
        Err(err) => {
            error!(topic = %envelope.topic, error = %err, "event handling failed");
        }
    }
}
