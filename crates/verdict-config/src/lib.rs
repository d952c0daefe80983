// crates/verdict-config/src/lib.rs
// ============================================================================
// Module: Verdict Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for verdict.toml semantics.
// Dependencies: verdict-core, serde, toml
// ============================================================================

//! ## Overview
//! `verdict-config` defines the canonical configuration model for the
//! Verdict service: fact store endpoints, cache backend selection and
//! expiry, and consumer subscription settings. Validation is strict and
//! fail-closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::CacheBackendKind;
pub use config::CacheConfig;
pub use config::ConfigError;
pub use config::ConfiguredCache;
pub use config::ConsumerConfig;
pub use config::ResolverConfig;
pub use config::VerdictConfig;
