use std::fmt;

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// BLAKE2b parameterised for a 32-byte digest.
///
/// The output length is part of the BLAKE2 parameter block, so this is not
/// the same function as a truncated BLAKE2b-512.
pub(crate) type Blake2b256 = Blake2b<U32>;

/// Hashes `data` with BLAKE2b-256.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    Blake2b256::digest(data).into()
}

/// A 256-bit digest rendered as 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotDigest(String);

impl SnapshotDigest {
    /// Wraps raw digest bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Hashes `data` and wraps the result.
    pub fn of(data: &[u8]) -> Self {
        Self::from_bytes(blake2b_256(data))
    }

    /// Parses a published digest, normalising case and surrounding whitespace.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let s = value.as_ref().trim().to_ascii_lowercase();
        let re = Regex::new(r"^[0-9a-f]{64}$").expect("invalid regex");
        if !re.is_match(&s) {
            return Err(ValidationError::PatternMismatch {
                field: "digest",
                value: s,
            });
        }
        Ok(Self(s))
    }

    /// Lowercase hex form.
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// Compares against a published hex string: trimmed and case-insensitive.
    /// A value that does not parse as a digest (including `""`) never matches.
    pub fn matches_published(&self, published: &str) -> bool {
        Self::parse(published).is_ok_and(|p| p == *self)
    }
}

impl fmt::Display for SnapshotDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SnapshotDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalises_case() {
        let upper = "AB".repeat(32);
        let digest = SnapshotDigest::parse(format!("  {upper}\n")).unwrap();
        assert_eq!(digest.as_hex(), "ab".repeat(32));
    }

    #[test]
    fn parse_rejects_short_values() {
        assert!(SnapshotDigest::parse("abcd").is_err());
    }

    #[test]
    fn empty_published_value_never_matches() {
        let digest = SnapshotDigest::of(b"");
        assert!(!digest.matches_published(""));
        assert!(!digest.matches_published("   "));
    }

    #[test]
    fn published_value_is_normalised_before_comparison() {
        let digest = SnapshotDigest::of(b"snapshot");
        let published = format!(" {}\n", digest.as_hex().to_uppercase());
        assert!(digest.matches_published(&published));
        assert!(!digest.matches_published(&digest.as_hex()[..63]));
    }
}
