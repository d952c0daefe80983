// crates/verdict-core/src/core/mod.rs
// ============================================================================
// Module: Verdict Core Types
// Description: Data model for subjects, facts, policies, and decisions.
// Purpose: Re-export the canonical core types.
// Dependencies: crate::core submodules
// ============================================================================

//! ## Overview
//! Core types are read-only projections of external store state plus the
//! in-memory policy and decision model. All wire forms are stable.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod decision;
pub mod identifiers;
pub mod policy;
pub mod result;
pub mod subject;
pub mod waiver;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::decision::Decision;
pub use self::decision::Requirement;
pub use self::decision::RequirementKind;
pub use self::decision::SUMMARY_ALL_PASSED;
pub use self::decision::SUMMARY_NO_POLICIES;
pub use self::decision::compose_summary;
pub use self::identifiers::DecisionContext;
pub use self::identifiers::PolicyId;
pub use self::identifiers::ProductVersion;
pub use self::identifiers::ResultId;
pub use self::identifiers::TestCaseName;
pub use self::identifiers::WaiverId;
pub use self::policy::Policy;
pub use self::policy::RequiredTestCase;
pub use self::policy::applicable_policies;
pub use self::result::Outcome;
pub use self::result::TestResult;
pub use self::result::latest_by_id;
pub use self::subject::Subject;
pub use self::subject::SubjectError;
pub use self::waiver::Waiver;
pub use self::waiver::is_waived;
