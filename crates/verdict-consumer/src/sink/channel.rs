// crates/verdict-consumer/src/sink/channel.rs
// ============================================================================
// Module: Channel Sink
// Description: Decision sink delivering updates over a bounded channel.
// Purpose: Feed in-process subscribers without blocking the detector.
// Dependencies: tokio
// ============================================================================

//! ## Overview
//! The channel sink hands updates to an in-process subscriber over a
//! bounded tokio channel. Delivery never blocks the detector: a full or
//! closed channel fails the publish instead of stalling event handling.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tokio::sync::mpsc;

use crate::sink::DecisionSink;
use crate::sink::DecisionUpdate;
use crate::sink::PublishError;

// ============================================================================
// SECTION: Channel Sink
// ============================================================================

/// Decision sink backed by a bounded in-process channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    /// Sending half of the subscriber channel.
    sender: mpsc::Sender<DecisionUpdate>,
}

impl ChannelSink {
    /// Creates a sink over the sending half of a subscriber channel.
    #[must_use]
    pub const fn new(sender: mpsc::Sender<DecisionUpdate>) -> Self {
        Self {
            sender,
        }
    }
}

impl DecisionSink for ChannelSink {
    fn publish(&self, update: DecisionUpdate) -> Result<(), PublishError> {
        self.sender.try_send(update).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => {
                PublishError::Sink("subscriber channel full".to_string())
            }
            mpsc::error::TrySendError::Closed(_) => {
                PublishError::Sink("subscriber channel closed".to_string())
            }
        })
    }
}
