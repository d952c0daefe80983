// crates/verdict-core/src/core/subject.rs
// ============================================================================
// Module: Verdict Subject
// Description: Identity of the artifact being gated.
// Purpose: Provide a typed ordered field mapping with canonical serialization.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`Subject`] identifies the artifact a gating decision is about, as an
//! ordered mapping of named scalar fields (for example
//! `{item: <nvr>, type: koji_build}` or `{productmd.compose.id: <id>}`).
//! Two subjects are equal iff their field mappings are equal, and the
//! canonical serialization sorts fields by key so cache keys derived from a
//! subject are byte-identical regardless of field insertion order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Subject field naming the artifact type for gating.
const TYPE_FIELD: &str = "type";

/// Subject field carried by compose results in place of an explicit type.
const COMPOSE_ID_FIELD: &str = "productmd.compose.id";

/// Gating type inferred for subjects carrying a compose identifier.
const COMPOSE_TYPE: &str = "compose";

// ============================================================================
// SECTION: Subject Errors
// ============================================================================

/// Errors raised when constructing a subject.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum SubjectError {
    /// Subject has no fields.
    #[error("subject has no fields")]
    Empty,
    /// Subject field name is empty.
    #[error("subject field name is empty")]
    EmptyFieldName,
    /// Subject field value is empty.
    #[error("subject field {0} has an empty value")]
    EmptyFieldValue(String),
}

// ============================================================================
// SECTION: Subject
// ============================================================================

/// Identity key of an artifact being gated.
///
/// # Invariants
/// - Contains at least one field; field names and values are non-empty.
/// - Immutable once constructed.
/// - Serializes as a sorted field map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subject {
    /// Sorted field mapping backing the subject identity.
    fields: BTreeMap<String, String>,
}

impl Subject {
    /// Creates a subject from named scalar fields.
    ///
    /// # Errors
    ///
    /// Returns [`SubjectError`] when the mapping is empty or contains empty
    /// field names or values.
    pub fn new<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Result<Self, SubjectError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut mapped = BTreeMap::new();
        for (key, value) in fields {
            let key = key.into();
            let value = value.into();
            if key.is_empty() {
                return Err(SubjectError::EmptyFieldName);
            }
            if value.is_empty() {
                return Err(SubjectError::EmptyFieldValue(key));
            }
            mapped.insert(key, value);
        }
        if mapped.is_empty() {
            return Err(SubjectError::Empty);
        }
        Ok(Self {
            fields: mapped,
        })
    }

    /// Returns the value of a named field, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Iterates the subject fields in sorted key order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Returns the gating type of this subject.
    ///
    /// An explicit `type` field wins; a `productmd.compose.id` field implies
    /// `compose`. Subjects with neither cannot be matched against policies.
    #[must_use]
    pub fn subject_type(&self) -> Option<&str> {
        if let Some(explicit) = self.get(TYPE_FIELD) {
            return Some(explicit);
        }
        if self.fields.contains_key(COMPOSE_ID_FIELD) {
            return Some(COMPOSE_TYPE);
        }
        None
    }

    /// Returns the canonical serialization of the subject.
    ///
    /// Fields are emitted as a JSON object in sorted key order, so the output
    /// is byte-identical for equal subjects regardless of how they were
    /// constructed. This is the only serialization used for cache-key
    /// derivation.
    #[must_use]
    pub fn canonical(&self) -> String {
        let mut out = String::from("{");
        for (index, (key, value)) in self.fields.iter().enumerate() {
            if index > 0 {
                out.push(',');
            }
            out.push_str(&serde_json::Value::String(key.clone()).to_string());
            out.push(':');
            out.push_str(&serde_json::Value::String(value.clone()).to_string());
        }
        out.push('}');
        out
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}
