// crates/verdict-core/src/core/result.rs
// ============================================================================
// Module: Verdict Test Results
// Description: Test result records and outcome classification.
// Purpose: Model result-store records with a stable outcome wire form.
// Dependencies: serde, crate::core
// ============================================================================

//! ## Overview
//! Test results are read-only projections of external result-store records.
//! Outcomes carry the store's fixed enumeration plus an escape hatch for
//! store-defined values; only PASSED and INFO satisfy a requirement, all
//! other outcomes are non-satisfying unless waived.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ResultId;
use crate::core::identifiers::TestCaseName;
use crate::core::subject::Subject;

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Outcome of a test result as reported by the result store.
///
/// # Invariants
/// - The wire form is the store's uppercase string; unknown values round-trip
///   through [`Outcome::Other`] without loss.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Outcome {
    /// Test passed.
    Passed,
    /// Test failed.
    Failed,
    /// Test errored before producing a verdict.
    Error,
    /// Informational outcome; treated as satisfying.
    Info,
    /// Test is queued and has not run yet.
    Queued,
    /// Test is currently running.
    Running,
    /// Store-defined outcome outside the fixed enumeration.
    Other(String),
}

impl Outcome {
    /// Returns true when the outcome satisfies a requirement by itself.
    #[must_use]
    pub const fn is_satisfying(&self) -> bool {
        matches!(self, Self::Passed | Self::Info)
    }

    /// Returns the wire form of the outcome.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
            Self::Error => "ERROR",
            Self::Info => "INFO",
            Self::Queued => "QUEUED",
            Self::Running => "RUNNING",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for Outcome {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PASSED" => Self::Passed,
            "FAILED" => Self::Failed,
            "ERROR" => Self::Error,
            "INFO" => Self::Info,
            "QUEUED" => Self::Queued,
            "RUNNING" => Self::Running,
            _ => Self::Other(value),
        }
    }
}

impl From<Outcome> for String {
    fn from(value: Outcome) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Test Result
// ============================================================================

/// Test result record fetched from the result store.
///
/// # Invariants
/// - `id` is store-assigned and monotonic; reruns of the same testcase get a
///   higher id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    /// Store-assigned result identifier.
    pub id: ResultId,
    /// Name of the test case this result reports on.
    pub testcase: TestCaseName,
    /// Reported outcome.
    pub outcome: Outcome,
    /// Optional scenario the test ran under.
    pub scenario: Option<String>,
    /// Subject the result was reported against.
    pub subject: Subject,
}

/// Selects the most recent result by store-assigned id.
///
/// Ties on id resolve to the later element in iteration order, which is
/// deterministic for a fixed store response order.
#[must_use]
pub fn latest_by_id<'a>(results: impl IntoIterator<Item = &'a TestResult>) -> Option<&'a TestResult> {
    results.into_iter().max_by_key(|result| result.id)
}
