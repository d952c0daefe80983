// crates/verdict-core/src/core/decision.rs
// ============================================================================
// Module: Verdict Decisions
// Description: Decision and unsatisfied-requirement records.
// Purpose: Model the aggregate gating decision and its human summary.
// Dependencies: serde, crate::core
// ============================================================================

//! ## Overview
//! A [`Decision`] is the aggregate answer for one subject under one decision
//! context and product version. Decisions are constructed fresh per query or
//! event, never mutated after construction, and never persisted; the
//! optional `previous` field is a point-in-time snapshot used by change
//! notifications, not a back-reference.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::DecisionContext;
use crate::core::identifiers::PolicyId;
use crate::core::identifiers::ProductVersion;
use crate::core::identifiers::TestCaseName;
use crate::core::subject::Subject;

// ============================================================================
// SECTION: Summary Strings
// ============================================================================

/// Summary emitted when every required test passed or was waived.
pub const SUMMARY_ALL_PASSED: &str = "all required tests passed";

/// Summary emitted when no configured policy applies to the query.
pub const SUMMARY_NO_POLICIES: &str = "no applicable policies";

// ============================================================================
// SECTION: Requirement
// ============================================================================

/// Classification of an unsatisfied requirement.
///
/// # Invariants
/// - The wire form is the kebab-case string used by API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequirementKind {
    /// No matching result was found for the required test case.
    #[serde(rename = "test-result-missing")]
    Missing,
    /// The most recent matching result failed.
    #[serde(rename = "test-result-failed")]
    Failed,
    /// The most recent matching result errored.
    #[serde(rename = "test-result-errored")]
    Errored,
}

impl RequirementKind {
    /// Returns the wire form of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "test-result-missing",
            Self::Failed => "test-result-failed",
            Self::Errored => "test-result-errored",
        }
    }
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unsatisfied required-testcase obligation in a decision.
///
/// # Invariants
/// - At most one entry exists per (testcase, scenario) pair in a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Name of the unsatisfied test case.
    pub testcase: TestCaseName,
    /// Subject field mapping the requirement applies to.
    pub item: Subject,
    /// Requirement classification.
    #[serde(rename = "type")]
    pub kind: RequirementKind,
    /// Scenario the requirement applies to, if scenario-scoped.
    pub scenario: Option<String>,
}

// ============================================================================
// SECTION: Decision
// ============================================================================

/// Aggregate gating decision for one subject.
///
/// # Invariants
/// - `policies_satisfied` is true iff `unsatisfied_requirements` is empty.
/// - `applicable_policies` preserves policy configuration order.
/// - Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Whether every applicable policy is satisfied.
    pub policies_satisfied: bool,
    /// Decision context the decision was computed for.
    pub decision_context: DecisionContext,
    /// Product version the decision was computed for.
    pub product_version: ProductVersion,
    /// Subject the decision is about.
    pub subject: Subject,
    /// Identifiers of the applicable policies, in configuration order.
    pub applicable_policies: Vec<PolicyId>,
    /// Unsatisfied requirements, de-duplicated across policies.
    pub unsatisfied_requirements: Vec<Requirement>,
    /// Advisory human-readable summary.
    pub summary: String,
    /// Point-in-time snapshot of the pre-event decision, for notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<Box<Decision>>,
}

impl Decision {
    /// Builds the vacuously satisfied decision for a scope with no
    /// applicable policies.
    #[must_use]
    pub fn vacuous(
        subject: Subject,
        decision_context: DecisionContext,
        product_version: ProductVersion,
    ) -> Self {
        Self {
            policies_satisfied: true,
            decision_context,
            product_version,
            subject,
            applicable_policies: Vec::new(),
            unsatisfied_requirements: Vec::new(),
            summary: SUMMARY_NO_POLICIES.to_string(),
            previous: None,
        }
    }

    /// Returns true when the observable outcome of two decisions matches.
    ///
    /// Only `policies_satisfied` and `unsatisfied_requirements` participate;
    /// the summary is advisory and `previous` snapshots are ignored.
    #[must_use]
    pub fn same_outcome(&self, other: &Self) -> bool {
        self.policies_satisfied == other.policies_satisfied
            && self.unsatisfied_requirements == other.unsatisfied_requirements
    }

    /// Attaches a point-in-time snapshot of the pre-event decision.
    #[must_use]
    pub fn with_previous(mut self, previous: Self) -> Self {
        self.previous = Some(Box::new(previous));
        self
    }
}

// ============================================================================
// SECTION: Summary Composition
// ============================================================================

/// Composes the advisory summary for a computed decision.
///
/// `total` is the number of requirement instances evaluated after scenario
/// expansion, de-duplicated across policies.
#[must_use]
pub fn compose_summary(unsatisfied: &[Requirement], total: usize) -> String {
    if unsatisfied.is_empty() {
        return SUMMARY_ALL_PASSED.to_string();
    }
    let count = unsatisfied.len();
    if unsatisfied.iter().all(|requirement| requirement.kind == RequirementKind::Missing) {
        format!("{count} of {total} required tests not found")
    } else {
        format!("{count} of {total} required tests did not pass")
    }
}
