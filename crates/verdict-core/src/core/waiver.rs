// crates/verdict-core/src/core/waiver.rs
// ============================================================================
// Module: Verdict Waivers
// Description: Human-issued waiver records from the waiver store.
// Purpose: Model waivers and their precedence over non-satisfying results.
// Dependencies: serde, crate::core
// ============================================================================

//! ## Overview
//! A waiver is a human override marking a non-satisfying required test as
//! acceptable for an exact (subject, testcase, product version) triple.
//! Waivers are read-only projections of waiver-store records.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ProductVersion;
use crate::core::identifiers::TestCaseName;
use crate::core::identifiers::WaiverId;
use crate::core::subject::Subject;

// ============================================================================
// SECTION: Waiver
// ============================================================================

/// Waiver record fetched from the waiver store.
///
/// # Invariants
/// - `id` is store-assigned and monotonic.
/// - A waiver only ever applies to its exact subject, testcase, and product
///   version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waiver {
    /// Store-assigned waiver identifier.
    pub id: WaiverId,
    /// Subject the waiver applies to.
    pub subject: Subject,
    /// Test case the waiver applies to.
    pub testcase: TestCaseName,
    /// Product version the waiver applies to.
    pub product_version: ProductVersion,
    /// Whether the requirement is waived.
    pub waived: bool,
}

impl Waiver {
    /// Returns true when this waiver waives the given requirement.
    #[must_use]
    pub fn waives(
        &self,
        subject: &Subject,
        testcase: &TestCaseName,
        product_version: &ProductVersion,
    ) -> bool {
        self.waived
            && self.subject == *subject
            && self.testcase == *testcase
            && self.product_version == *product_version
    }
}

/// Returns true when any waiver in the set waives the given requirement.
#[must_use]
pub fn is_waived(
    waivers: &[Waiver],
    subject: &Subject,
    testcase: &TestCaseName,
    product_version: &ProductVersion,
) -> bool {
    waivers.iter().any(|waiver| waiver.waives(subject, testcase, product_version))
}
