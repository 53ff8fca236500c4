//! Content fingerprinting.
//!
//! Fingerprints are SHA-256 digests of raw document bytes, rendered as
//! lowercase hex. They are only compared for equality.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{self, Write};

/// Hex-encoded SHA-256 digest of a document's content
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stateless content hasher
pub struct ContentHasher;

impl ContentHasher {
    /// Fingerprint `bytes`
    pub fn hash(bytes: &[u8]) -> Fingerprint {
        let digest = Self::digest(bytes);
        let mut hex = String::with_capacity(digest.len() * 2);
        for byte in digest {
            // Writing to a String cannot fail
            let _ = write!(hex, "{byte:02x}");
        }
        Fingerprint(hex)
    }

    /// Raw 32-byte SHA-256 digest
    pub fn digest(bytes: &[u8]) -> [u8; 32] {
        Sha256::digest(bytes).into()
    }
}
