// crates/verdict-consumer/src/detector.rs
// ============================================================================
// Module: Decision Change Detector
// Description: Recompute decisions on fact changes and publish real changes.
// Purpose: Turn fact-change events into decision.update notifications.
// Dependencies: verdict-core, crate::{event, sink}
// ============================================================================

//! ## Overview
//! On each fact-change event the detector invalidates the subject's cached
//! facts, then for every potentially affected (context, product version)
//! pair computes the decision twice: once with the new fact excluded, which
//! reconstructs the pre-event state from current store contents, and once
//! fresh. A notification is published only when the two differ in
//! observable outcome; summary-only differences and no-op reruns stay
//! silent. Redelivering an event at worst republishes the identical
//! notification, and once a newer fact supersedes the event's fact the
//! comparison converges and nothing is published at all.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;
use tracing::debug;
use tracing::info;
use tracing::warn;
use verdict_core::CacheBackend;
use verdict_core::DecisionEngine;
use verdict_core::DecisionError;
use verdict_core::DecisionQuery;
use verdict_core::FactResolver;

use crate::event::GatingEvent;
use crate::sink::DecisionSink;
use crate::sink::DecisionUpdate;
use crate::sink::PublishError;

// ============================================================================
// SECTION: Detector Errors
// ============================================================================

/// Change detection errors.
#[derive(Debug, Error)]
pub enum DetectorError {
    /// A decision could not be computed.
    #[error(transparent)]
    Decision(#[from] DecisionError),
    /// A changed decision could not be published.
    #[error(transparent)]
    Publish(#[from] PublishError),
}

// ============================================================================
// SECTION: Change Detector
// ============================================================================

/// Detector recomputing decisions on fact changes.
pub struct ChangeDetector<R, C, S> {
    /// Decision engine shared with the query path.
    engine: DecisionEngine<R, C>,
    /// Sink for decision-change notifications.
    sink: S,
}

impl<R, C, S> ChangeDetector<R, C, S>
where
    R: FactResolver,
    C: CacheBackend,
    S: DecisionSink,
{
    /// Creates a detector over an engine and a sink.
    #[must_use]
    pub const fn new(engine: DecisionEngine<R, C>, sink: S) -> Self {
        Self {
            engine,
            sink,
        }
    }

    /// Returns the underlying decision engine.
    #[must_use]
    pub const fn engine(&self) -> &DecisionEngine<R, C> {
        &self.engine
    }

    /// Handles one fact-change event, returning how many updates published.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError`] when a decision cannot be computed or a
    /// changed decision cannot be published.
    pub fn handle_event(&self, event: &GatingEvent) -> Result<usize, DetectorError> {
        let subject = event.subject();
        let Some(subject_type) = subject.subject_type().map(ToString::to_string) else {
            warn!(subject = %subject, "event subject has no gating type; skipping");
            return Ok(0);
        };

        self.engine.invalidate_subject(subject);

        let mut published = 0_usize;
        for (context, version) in self.engine.affected_contexts(&subject_type) {
            // Waivers are product-version scoped; a waiver event cannot
            // change decisions under any other version.
            if let GatingEvent::WaiverNew {
                product_version, ..
            } = event
                && *product_version != version
            {
                continue;
            }

            let fresh = DecisionQuery::new(subject.clone(), context.clone(), version.clone());
            let previous = self.engine.decide(&exclude_event_fact(fresh.clone(), event))?;
            let current = self.engine.decide(&fresh)?;

            if current.same_outcome(&previous) {
                debug!(
                    context = %context,
                    product_version = %version,
                    "decision outcome unchanged; suppressing update"
                );
                continue;
            }

            info!(
                context = %context,
                product_version = %version,
                satisfied = current.policies_satisfied,
                "decision changed; publishing update"
            );
            self.sink.publish(DecisionUpdate::new(current.with_previous(previous)))?;
            published += 1;
        }
        Ok(published)
    }
}

/// Adds the event's fact to a query's exclusion set.
fn exclude_event_fact(query: DecisionQuery, event: &GatingEvent) -> DecisionQuery {
    match event {
        GatingEvent::ResultNew {
            result_id, ..
        } => query.ignoring_result(*result_id),
        GatingEvent::WaiverNew {
            waiver_id, ..
        } => query.ignoring_waiver(*waiver_id),
    }
}
