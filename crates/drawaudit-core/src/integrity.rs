//! Level 1: whole-file snapshot integrity.

use drawaudit_canonical::SnapshotDigest;
use serde::Serialize;

use crate::verdict::CheckStatus;

/// Level 1 verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    /// Published digest, trimmed and lowercased (`""` when missing).
    pub expected: String,
    /// Digest of the snapshot bytes.
    pub computed: SnapshotDigest,
    /// Match only when `expected` is non-empty and equals `computed`.
    pub status: CheckStatus,
}

impl IntegrityReport {
    /// Whether the level passed.
    pub fn is_match(&self) -> bool {
        self.status.is_match()
    }
}

/// Hashes the exact snapshot bytes and compares them with the published digest.
pub fn check_integrity(snapshot: &[u8], published: &str) -> IntegrityReport {
    let computed = SnapshotDigest::of(snapshot);
    let status = CheckStatus::from_bool(computed.matches_published(published));
    tracing::debug!(
        bytes = snapshot.len(),
        computed = %computed,
        ?status,
        "snapshot integrity checked"
    );
    IntegrityReport {
        expected: published.trim().to_lowercase(),
        computed,
        status,
    }
}
