//! Level 3: reproduce the published winner list.
//!
//! Efraimidis–Spirakis weighted sampling without replacement: every candidate
//! with positive weight gets the key `-ln(u) / weight` where `u` is derived
//! from `(seed, period, shard, identity)`; the `k` smallest keys win, in
//! ascending key order.

use std::cmp::Ordering;

use drawaudit_canonical::{derive_u, display_alias, score, Record};
use serde::Serialize;

use crate::seed::Seed;

/// Differences listed in a content mismatch.
pub const MAX_REPORTED_DIFFERENCES: usize = 12;

/// A candidate that made the reproduced winner list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReproducedWinner {
    /// 0-based rank (primary winners first, then alternates).
    pub rank: usize,
    /// Shard of the winning record.
    pub shard: u64,
    /// Full identity.
    pub identity: String,
    /// Weight of the winning record.
    pub weight: i64,
    /// Exponential key; lower ranks first.
    pub score: f64,
    /// Display alias as it should appear in the artifact.
    pub alias: String,
}

/// One position where reproduced and published aliases disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasDifference {
    /// 0-based position in the combined winner list.
    pub index: usize,
    /// Alias computed by the auditor.
    pub computed: String,
    /// Alias in the artifact; `None` for a published `null`.
    pub published: Option<String>,
}

/// Level 3 verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReproductionOutcome {
    /// No seed has been revealed yet; nothing was derived.
    Unavailable,
    /// Reproduced aliases equal the published ones, position by position.
    Match,
    /// Reproduced and published lists have different lengths.
    SizeMismatch {
        /// Number of reproduced winners.
        computed: usize,
        /// Number of published aliases.
        published: usize,
    },
    /// Same length, different content.
    ContentMismatch {
        /// First differing positions.
        differences: Vec<AliasDifference>,
    },
}

impl ReproductionOutcome {
    /// Whether the outcome is a finding against the artifact.
    pub fn is_mismatch(&self) -> bool {
        matches!(
            self,
            ReproductionOutcome::SizeMismatch { .. } | ReproductionOutcome::ContentMismatch { .. }
        )
    }
}

/// Full Level 3 report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReproductionReport {
    /// Seed used, hex encoded (absent when unavailable).
    pub seed_hex: Option<String>,
    /// Published `k_primary`.
    pub k_primary: u64,
    /// Published `k_alternates`.
    pub k_alternates: u64,
    /// Reproduced winners in rank order.
    pub winners: Vec<ReproducedWinner>,
    /// Comparison against the artifact.
    pub outcome: ReproductionOutcome,
}

impl ReproductionReport {
    /// Report for a draw whose seed is still secret.
    pub fn unavailable(k_primary: u64, k_alternates: u64) -> Self {
        Self {
            seed_hex: None,
            k_primary,
            k_alternates,
            winners: Vec::new(),
            outcome: ReproductionOutcome::Unavailable,
        }
    }

    /// Aliases of the reproduced winners.
    pub fn aliases(&self) -> Vec<&str> {
        self.winners.iter().map(|w| w.alias.as_str()).collect()
    }
}

struct Candidate<'a> {
    score: f64,
    record: &'a Record,
}

/// Ranks candidates and returns the top `k_total`.
///
/// Records with weight `<= 0` cannot win and are skipped. Ties keep snapshot
/// order.
pub fn reproduce_winners(
    seed: &Seed,
    period: &str,
    records: &[Record],
    k_total: usize,
) -> Vec<ReproducedWinner> {
    let mut candidates: Vec<Candidate<'_>> = records
        .iter()
        .filter(|r| r.weight > 0)
        .map(|record| {
            let u = derive_u(seed.as_bytes(), period, record.shard, &record.identity);
            Candidate {
                score: score(u, record.weight),
                record,
            }
        })
        .collect();

    // Stable; scores are never NaN.
    candidates.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal));

    candidates
        .into_iter()
        .take(k_total)
        .enumerate()
        .map(|(rank, c)| ReproducedWinner {
            rank,
            shard: c.record.shard,
            identity: c.record.identity.clone(),
            weight: c.record.weight,
            score: c.score,
            alias: display_alias(&c.record.identity),
        })
        .collect()
}

/// Compares reproduced aliases with published ones.
///
/// A `None` published alias occupies its position and never matches.
pub fn compare_aliases(computed: &[String], published: &[Option<String>]) -> ReproductionOutcome {
    if computed.len() != published.len() {
        return ReproductionOutcome::SizeMismatch {
            computed: computed.len(),
            published: published.len(),
        };
    }
    let differences: Vec<AliasDifference> = computed
        .iter()
        .zip(published)
        .enumerate()
        .filter(|(_, (c, p))| p.as_deref() != Some(c.as_str()))
        .take(MAX_REPORTED_DIFFERENCES)
        .map(|(index, (c, p))| AliasDifference {
            index,
            computed: c.clone(),
            published: p.clone(),
        })
        .collect();

    if differences.is_empty() {
        ReproductionOutcome::Match
    } else {
        ReproductionOutcome::ContentMismatch { differences }
    }
}

/// Runs Level 3 end to end for a revealed seed.
pub fn check_reproduction(
    seed: &Seed,
    period: &str,
    records: &[Record],
    k_primary: u64,
    k_alternates: u64,
    published: &[Option<String>],
) -> ReproductionReport {
    let k_total = usize::try_from(k_primary.saturating_add(k_alternates)).unwrap_or(usize::MAX);
    let winners = reproduce_winners(seed, period, records, k_total);
    let computed: Vec<String> = winners.iter().map(|w| w.alias.clone()).collect();
    let outcome = compare_aliases(&computed, published);

    tracing::debug!(
        k_primary,
        k_alternates,
        candidates = records.iter().filter(|r| r.weight > 0).count(),
        reproduced = winners.len(),
        published = published.len(),
        "winners reproduced"
    );

    ReproductionReport {
        seed_hex: Some(seed.to_hex()),
        k_primary,
        k_alternates,
        winners,
        outcome,
    }
}
