// crates/verdict-resolve/src/lib.rs
// ============================================================================
// Module: Verdict Resolve Library
// Description: Fact resolver implementations for external stores.
// Purpose: Expose the HTTP-backed fact resolver.
// Dependencies: crate::http
// ============================================================================

//! ## Overview
//! Verdict resolve supplies [`verdict_core::FactResolver`] implementations
//! that talk to real stores. The HTTP resolver covers the result and waiver
//! store JSON APIs; the in-memory resolver for tests lives in the core
//! crate alongside the engine it exercises.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod http;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use http::HttpFactResolver;
pub use http::HttpResolverConfig;
