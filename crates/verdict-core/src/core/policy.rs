// crates/verdict-core/src/core/policy.rs
// ============================================================================
// Module: Verdict Policies
// Description: Policy model and applicability matching.
// Purpose: Select configured policies for a subject type, context, and version.
// Dependencies: serde, crate::core
// ============================================================================

//! ## Overview
//! Policies are already-parsed in-memory structures naming a decision
//! context, a set of product versions, a subject type, and an ordered list
//! of required test cases. Matching is exact on context and subject type and
//! by membership on product version; the matcher preserves configuration
//! order so `applicable_policies` is deterministic for a given query.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::DecisionContext;
use crate::core::identifiers::PolicyId;
use crate::core::identifiers::ProductVersion;
use crate::core::identifiers::TestCaseName;

// ============================================================================
// SECTION: Required Test Case
// ============================================================================

/// One required-testcase obligation inside a policy rule list.
///
/// # Invariants
/// - A rule with a scenario only matches results reporting that scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredTestCase {
    /// Name of the required test case.
    pub testcase: TestCaseName,
    /// Optional scenario the test must have run under.
    pub scenario: Option<String>,
}

impl RequiredTestCase {
    /// Creates a rule requiring a test case under any scenario.
    #[must_use]
    pub fn new(testcase: impl Into<TestCaseName>) -> Self {
        Self {
            testcase: testcase.into(),
            scenario: None,
        }
    }

    /// Creates a rule requiring a test case under an exact scenario.
    #[must_use]
    pub fn with_scenario(testcase: impl Into<TestCaseName>, scenario: impl Into<String>) -> Self {
        Self {
            testcase: testcase.into(),
            scenario: Some(scenario.into()),
        }
    }
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Configured gating policy.
///
/// # Invariants
/// - `rules` order is the configuration order and drives requirement order
///   in decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Policy identifier.
    pub id: PolicyId,
    /// Decision context this policy gates.
    pub decision_context: DecisionContext,
    /// Product versions this policy applies to.
    pub product_versions: BTreeSet<ProductVersion>,
    /// Subject type this policy applies to.
    pub subject_type: String,
    /// Ordered list of required test cases.
    pub rules: Vec<RequiredTestCase>,
}

impl Policy {
    /// Returns true when this policy applies to the given query scope.
    #[must_use]
    pub fn applies_to(
        &self,
        subject_type: &str,
        decision_context: &DecisionContext,
        product_version: &ProductVersion,
    ) -> bool {
        self.subject_type == subject_type
            && self.decision_context == *decision_context
            && self.product_versions.contains(product_version)
    }
}

// ============================================================================
// SECTION: Policy Matcher
// ============================================================================

/// Selects the policies applicable to a query scope.
///
/// Order is preserved from the configured policy list. An empty selection is
/// not an error; it yields a vacuously satisfied decision.
#[must_use]
pub fn applicable_policies<'a>(
    policies: &'a [Policy],
    subject_type: &str,
    decision_context: &DecisionContext,
    product_version: &ProductVersion,
) -> Vec<&'a Policy> {
    policies
        .iter()
        .filter(|policy| policy.applies_to(subject_type, decision_context, product_version))
        .collect()
}
