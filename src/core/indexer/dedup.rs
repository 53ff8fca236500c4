//! Dedup policies.
//!
//! Decides which existing records make a document count as already
//! indexed. The two building blocks are "a record with this filename
//! exists" and "a record with this fingerprint exists"; each policy
//! combines them differently.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::types::{Document, FieldCondition, Filter, FILENAME_KEY, FINGERPRINT_KEY};

/// When to skip a document because matching records already exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DedupPolicy {
    /// Same filename and same fingerprint on one record
    #[default]
    Unchanged,
    /// Same fingerprint anywhere in the collection
    Fingerprint,
    /// Same filename or same fingerprint
    PathOrFingerprint,
    /// Always re-index
    Never,
}

impl DedupPolicy {
    /// Filter whose matches mean "skip this document", or `None` when
    /// the policy never skips
    pub fn probe(&self, document: &Document) -> Option<Filter> {
        let path = FieldCondition::new(FILENAME_KEY, document.id.as_str());
        let fingerprint = FieldCondition::new(FINGERPRINT_KEY, document.fingerprint.as_str());

        match self {
            DedupPolicy::Unchanged => Some(Filter::all(vec![path, fingerprint])),
            DedupPolicy::Fingerprint => Some(Filter::all(vec![fingerprint])),
            DedupPolicy::PathOrFingerprint => Some(Filter::any(vec![path, fingerprint])),
            DedupPolicy::Never => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DedupPolicy::Unchanged => "unchanged",
            DedupPolicy::Fingerprint => "fingerprint",
            DedupPolicy::PathOrFingerprint => "path-or-fingerprint",
            DedupPolicy::Never => "never",
        }
    }
}

impl fmt::Display for DedupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DedupPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unchanged" => Ok(DedupPolicy::Unchanged),
            "fingerprint" => Ok(DedupPolicy::Fingerprint),
            "path-or-fingerprint" => Ok(DedupPolicy::PathOrFingerprint),
            "never" => Ok(DedupPolicy::Never),
            other => Err(format!(
                "unknown dedup policy '{other}' \
                 (expected unchanged, fingerprint, path-or-fingerprint or never)"
            )),
        }
    }
}
