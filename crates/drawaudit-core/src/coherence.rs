//! Level 2: structural coherence.
//!
//! Three independent sub-checks over the parsed snapshot: declared totals,
//! canonical ordering, and the canonical snapshot digest. All three are
//! always evaluated so a report shows every failing aspect at once.

use std::collections::HashSet;

use drawaudit_canonical::{
    canonical_snapshot_hash, parse_snapshot, validate_canonical_order, OrderViolation, Record,
    RecordSet, SnapshotDigest, SnapshotError,
};
use serde::Serialize;

use crate::artifact::ResultArtifact;
use crate::verdict::CheckStatus;

/// Declared versus actual totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TotalsCheck {
    /// Published `totals.users`.
    pub expected_users: u64,
    /// Number of parsed rows.
    pub actual_users: u64,
    /// Published `totals.entries`.
    pub expected_entries: u64,
    /// Sum of `max(0, weight)`.
    pub actual_entries: u128,
    /// Both totals agree.
    pub status: CheckStatus,
}

/// Canonical ordering result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderCheck {
    /// First violation, if any.
    pub violation: Option<OrderViolation>,
    /// No violation found.
    pub status: CheckStatus,
}

/// Canonical digest recomputed from parsed rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashCheck {
    /// Published digest, trimmed and lowercased.
    pub expected: String,
    /// Canonical digest of `(period, records)`.
    pub computed: SnapshotDigest,
    /// Digests agree.
    pub status: CheckStatus,
}

/// Which sub-check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoherenceFailure {
    /// Totals differ.
    Totals,
    /// Rows are out of canonical order.
    Order,
    /// Canonical digest differs.
    Hash,
}

/// Level 2 verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoherenceReport {
    /// Totals sub-check.
    pub totals: TotalsCheck,
    /// Ordering sub-check.
    pub order: OrderCheck,
    /// Canonical hash sub-check.
    pub hash: HashCheck,
    /// Rows whose identity already appeared earlier in the snapshot.
    /// Informational only; duplicates do not fail the level.
    pub duplicate_identities: usize,
    /// Match only when every sub-check matches.
    pub status: CheckStatus,
}

impl CoherenceReport {
    /// Whether the level passed.
    pub fn is_match(&self) -> bool {
        self.status.is_match()
    }

    /// Failing sub-checks, in report order.
    pub fn failures(&self) -> Vec<CoherenceFailure> {
        let mut failures = Vec::new();
        if !self.totals.status.is_match() {
            failures.push(CoherenceFailure::Totals);
        }
        if !self.order.status.is_match() {
            failures.push(CoherenceFailure::Order);
        }
        if !self.hash.status.is_match() {
            failures.push(CoherenceFailure::Hash);
        }
        failures
    }
}

/// Parses the snapshot and checks it against the artifact.
pub fn check_coherence(
    snapshot: &[u8],
    period: &str,
    artifact: &ResultArtifact,
) -> Result<CoherenceReport, SnapshotError> {
    let records = parse_snapshot(snapshot)?;
    Ok(check_records(&RecordSet::new(period, records), artifact))
}

/// Checks already-parsed records against the artifact.
pub fn check_records(set: &RecordSet, artifact: &ResultArtifact) -> CoherenceReport {
    let totals = check_totals(set, artifact);

    let violation = validate_canonical_order(&set.records).err();
    let order = OrderCheck {
        status: CheckStatus::from_bool(violation.is_none()),
        violation,
    };

    let computed = canonical_snapshot_hash(&set.period, &set.records);
    let published = artifact.published_hash();
    let hash = HashCheck {
        expected: published.trim().to_lowercase(),
        status: CheckStatus::from_bool(computed.matches_published(published)),
        computed,
    };

    let status = CheckStatus::from_bool(
        totals.status.is_match() && order.status.is_match() && hash.status.is_match(),
    );
    let report = CoherenceReport {
        duplicate_identities: count_duplicates(&set.records),
        totals,
        order,
        hash,
        status,
    };

    tracing::debug!(
        rows = report.totals.actual_users,
        entries = %report.totals.actual_entries,
        canonical = %report.hash.computed,
        duplicates = report.duplicate_identities,
        ?status,
        "snapshot coherence checked"
    );
    if report.duplicate_identities > 0 {
        tracing::info!(
            duplicates = report.duplicate_identities,
            "snapshot repeats identities"
        );
    }
    report
}

fn check_totals(set: &RecordSet, artifact: &ResultArtifact) -> TotalsCheck {
    let actual_users = set.users();
    let actual_entries = set.entries();
    let expected = &artifact.totals;
    TotalsCheck {
        expected_users: expected.users,
        actual_users,
        expected_entries: expected.entries,
        actual_entries,
        status: CheckStatus::from_bool(
            expected.users == actual_users && u128::from(expected.entries) == actual_entries,
        ),
    }
}

fn count_duplicates(records: &[Record]) -> usize {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .iter()
        .filter(|r| !seen.insert(r.identity.as_str()))
        .count()
}
