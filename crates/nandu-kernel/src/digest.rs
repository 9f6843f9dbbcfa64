//! Content digests for grids.
//!
//! A digest names a board independently of where its description came from:
//! two files that parse to the same grid share a digest, because the hash is
//! taken over the canonical rendering rather than the raw input bytes.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Hex-encoded SHA-256 of a grid's canonical text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDigest(pub String);

impl GridDigest {
    /// Compute a digest from raw bytes.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{hash:x}"))
    }

    /// Compute a digest from canonical grid text.
    pub fn from_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// First `len` hex characters, for compact human output.
    pub fn short(&self, len: usize) -> &str {
        &self.0[..len.min(self.0.len())]
    }
}

impl fmt::Display for GridDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
