// crates/verdict-consumer/src/sink/log.rs
// ============================================================================
// Module: Log Sink
// Description: Decision sink writing one JSON line per update.
// Purpose: Provide a durable, greppable record of decision changes.
// Dependencies: serde_json, time
// ============================================================================

//! ## Overview
//! The log sink appends one timestamped JSON line per decision update to
//! any writer. Lines are self-contained so downstream tooling can tail the
//! stream without state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;

use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::sink::DecisionSink;
use crate::sink::DecisionUpdate;
use crate::sink::PublishError;

// ============================================================================
// SECTION: Log Line
// ============================================================================

/// One serialized log line.
#[derive(Debug, Serialize)]
struct LogLine<'a> {
    /// Publication timestamp, RFC 3339.
    timestamp: String,
    /// The published update.
    #[serde(flatten)]
    update: &'a DecisionUpdate,
}

// ============================================================================
// SECTION: Log Sink
// ============================================================================

/// Decision sink appending JSON lines to a writer.
#[derive(Debug)]
pub struct LogSink<W> {
    /// Writer protected for concurrent publishes.
    writer: Mutex<W>,
}

impl<W> LogSink<W>
where
    W: Write + Send,
{
    /// Creates a sink over a writer.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the sink and returns the writer.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] when the writer lock is poisoned.
    pub fn into_inner(self) -> Result<W, PublishError> {
        self.writer.into_inner().map_err(|err| PublishError::Sink(err.to_string()))
    }
}

impl<W> DecisionSink for LogSink<W>
where
    W: Write + Send,
{
    fn publish(&self, update: DecisionUpdate) -> Result<(), PublishError> {
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|err| PublishError::Sink(format!("timestamp format failed: {err}")))?;
        let line = serde_json::to_string(&LogLine {
            timestamp,
            update: &update,
        })
        .map_err(|err| PublishError::Sink(format!("update serialization failed: {err}")))?;

        let mut writer =
            self.writer.lock().map_err(|err| PublishError::Sink(err.to_string()))?;
        writeln!(writer, "{line}")
            .map_err(|err| PublishError::Sink(format!("update write failed: {err}")))
    }
}
