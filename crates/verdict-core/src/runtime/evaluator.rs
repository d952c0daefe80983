// crates/verdict-core/src/runtime/evaluator.rs
// ============================================================================
// Module: Verdict Requirement Evaluator
// Description: Per-policy evaluation of required test cases.
// Purpose: Classify each required test as satisfied, missing, failed, or errored.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The evaluator takes one policy plus the resolved result and waiver sets
//! for a subject and produces the requirement instances for that policy
//! alone. Only the most recent result by store id counts for a requirement.
//! A rule that names a scenario matches that scenario exactly; a rule
//! without a scenario evaluates one instance per distinct scenario actually
//! reported, so a policy's requirement count can grow with however many
//! scenarios a test happens to report. That behavior is preserved from the
//! production systems this design follows; tightening it could break
//! existing policies.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::Outcome;
use crate::core::Policy;
use crate::core::ProductVersion;
use crate::core::RequiredTestCase;
use crate::core::RequirementKind;
use crate::core::TestCaseName;
use crate::core::TestResult;
use crate::core::Waiver;
use crate::core::is_waived;
use crate::core::latest_by_id;
use crate::core::subject::Subject;

// ============================================================================
// SECTION: Requirement Instances
// ============================================================================

/// One evaluated requirement obligation for a subject.
///
/// # Invariants
/// - `unsatisfied` is `None` when the requirement is satisfied or waived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementInstance {
    /// Name of the required test case.
    pub testcase: TestCaseName,
    /// Scenario this instance is scoped to, if any.
    pub scenario: Option<String>,
    /// Unsatisfied classification, or `None` when satisfied.
    pub unsatisfied: Option<RequirementKind>,
}

impl RequirementInstance {
    /// Returns the de-duplication key for this instance.
    #[must_use]
    pub fn dedup_key(&self) -> (TestCaseName, Option<String>) {
        (self.testcase.clone(), self.scenario.clone())
    }
}

// ============================================================================
// SECTION: Policy Evaluation
// ============================================================================

/// Evaluates one policy against the resolved facts for a subject.
///
/// Instances are returned in rule order; a scenario-expanded rule
/// contributes its instances in scenario order for determinism.
#[must_use]
pub fn evaluate_policy(
    policy: &Policy,
    subject: &Subject,
    product_version: &ProductVersion,
    results: &[TestResult],
    waivers: &[Waiver],
) -> Vec<RequirementInstance> {
    let mut instances = Vec::new();
    for rule in &policy.rules {
        instances.extend(evaluate_rule(rule, subject, product_version, results, waivers));
    }
    instances
}

/// Evaluates one required test case against the resolved facts.
fn evaluate_rule(
    rule: &RequiredTestCase,
    subject: &Subject,
    product_version: &ProductVersion,
    results: &[TestResult],
    waivers: &[Waiver],
) -> Vec<RequirementInstance> {
    let matching: Vec<&TestResult> = results
        .iter()
        .filter(|result| result.testcase == rule.testcase && result.subject == *subject)
        .collect();

    if let Some(scenario) = &rule.scenario {
        let scoped =
            matching.iter().copied().filter(|result| result.scenario.as_ref() == Some(scenario));
        let instance = evaluate_candidates(
            rule,
            Some(scenario.clone()),
            latest_by_id(scoped),
            subject,
            product_version,
            waivers,
        );
        return vec![instance];
    }

    if matching.is_empty() {
        return vec![evaluate_candidates(rule, None, None, subject, product_version, waivers)];
    }

    // One instance per distinct scenario actually reported, ordered by
    // scenario name (unscoped results sort first).
    let mut by_scenario: BTreeMap<Option<String>, Vec<&TestResult>> = BTreeMap::new();
    for result in matching {
        by_scenario.entry(result.scenario.clone()).or_default().push(result);
    }
    by_scenario
        .into_iter()
        .map(|(scenario, candidates)| {
            evaluate_candidates(
                rule,
                scenario,
                latest_by_id(candidates),
                subject,
                product_version,
                waivers,
            )
        })
        .collect()
}

/// Classifies one requirement instance from its most recent result.
fn evaluate_candidates(
    rule: &RequiredTestCase,
    scenario: Option<String>,
    latest: Option<&TestResult>,
    subject: &Subject,
    product_version: &ProductVersion,
    waivers: &[Waiver],
) -> RequirementInstance {
    let kind = latest.map_or(Some(RequirementKind::Missing), |result| {
        unsatisfied_kind(&result.outcome)
    });
    let kind = kind.filter(|_| !is_waived(waivers, subject, &rule.testcase, product_version));
    RequirementInstance {
        testcase: rule.testcase.clone(),
        scenario,
        unsatisfied: kind,
    }
}

/// Maps a result outcome to its unsatisfied classification, if any.
///
/// QUEUED and RUNNING evaluate as missing (the test has not finished);
/// store-defined outcomes outside the fixed enumeration evaluate as failed,
/// because a gating decision must not be optimistic about outcomes it does
/// not understand.
fn unsatisfied_kind(outcome: &Outcome) -> Option<RequirementKind> {
    match outcome {
        Outcome::Passed | Outcome::Info => None,
        Outcome::Queued | Outcome::Running => Some(RequirementKind::Missing),
        Outcome::Error => Some(RequirementKind::Errored),
        Outcome::Failed | Outcome::Other(_) => Some(RequirementKind::Failed),
    }
}
