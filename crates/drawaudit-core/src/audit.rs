//! Audit orchestration across the three levels.

use drawaudit_canonical::{parse_snapshot, Record, RecordSet};
use serde::{Deserialize, Serialize};

use crate::artifact::ResultArtifact;
use crate::coherence::{check_records, CoherenceReport};
use crate::errors::{CoreError, LevelError};
use crate::integrity::{check_integrity, IntegrityReport};
use crate::reproduction::{check_reproduction, ReproductionOutcome, ReproductionReport};
use crate::seed::Seed;
use crate::verdict::{Level, LevelOutcome, SkipReason};

/// Caller-controlled run options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditOptions {
    /// Levels to run; unselected levels are reported as skipped.
    pub levels: Vec<Level>,
    /// Keep running later levels after a failing one.
    pub continue_on_failure: bool,
    /// Period to use when the artifact does not name one.
    pub period_fallback: Option<String>,
    /// Seed hex that takes precedence over the artifact's revealed seed.
    pub seed_override: Option<String>,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            levels: Level::ALL.to_vec(),
            continue_on_failure: false,
            period_fallback: None,
            seed_override: None,
        }
    }
}

impl AuditOptions {
    /// Options that run only `level`.
    pub fn only(level: Level) -> Self {
        Self {
            levels: vec![level],
            ..Self::default()
        }
    }

    fn selects(&self, level: Level) -> bool {
        self.levels.contains(&level)
    }
}

/// First failing level of a run, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Failure {
    /// Level 1 digest mismatch.
    IntegrityMismatch,
    /// Level 2 sub-check mismatch.
    CoherenceMismatch,
    /// Level 3 reproduced a different number of winners.
    ReproductionSizeMismatch,
    /// Level 3 reproduced different winners.
    ReproductionContentMismatch,
    /// A level could not run on the inputs.
    LevelError(Level),
}

/// Verdicts of one audit run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditReport {
    /// Period the audit ran for.
    pub period: String,
    /// Level 1.
    pub integrity: LevelOutcome<IntegrityReport>,
    /// Level 2.
    pub coherence: LevelOutcome<CoherenceReport>,
    /// Level 3.
    pub reproduction: LevelOutcome<ReproductionReport>,
}

impl AuditReport {
    /// First failing level, if any. A seed that is not yet revealed is not a
    /// failure; see [`AuditReport::seed_unavailable`].
    pub fn first_failure(&self) -> Option<Failure> {
        match &self.integrity {
            LevelOutcome::Completed(r) if !r.is_match() => return Some(Failure::IntegrityMismatch),
            LevelOutcome::Errored(_) => return Some(Failure::LevelError(Level::Integrity)),
            _ => {}
        }
        match &self.coherence {
            LevelOutcome::Completed(r) if !r.is_match() => return Some(Failure::CoherenceMismatch),
            LevelOutcome::Errored(_) => return Some(Failure::LevelError(Level::Coherence)),
            _ => {}
        }
        match &self.reproduction {
            LevelOutcome::Completed(r) => match r.outcome {
                ReproductionOutcome::SizeMismatch { .. } => {
                    Some(Failure::ReproductionSizeMismatch)
                }
                ReproductionOutcome::ContentMismatch { .. } => {
                    Some(Failure::ReproductionContentMismatch)
                }
                _ => None,
            },
            LevelOutcome::Errored(_) => Some(Failure::LevelError(Level::Reproduction)),
            LevelOutcome::Skipped(_) => None,
        }
    }

    /// Level 3 ran but the seed has not been revealed.
    pub fn seed_unavailable(&self) -> bool {
        matches!(
            self.reproduction.verdict().map(|r| &r.outcome),
            Some(ReproductionOutcome::Unavailable)
        )
    }

    /// No level failed.
    pub fn passed(&self) -> bool {
        self.first_failure().is_none()
    }
}

/// Runs audits over in-memory inputs.
///
/// Stateless; one instance may serve any number of independent runs.
#[derive(Debug, Clone, Default)]
pub struct Auditor {
    options: AuditOptions,
}

impl Auditor {
    /// Creates an auditor with the given options.
    pub fn new(options: AuditOptions) -> Self {
        Self { options }
    }

    /// Options in effect.
    pub fn options(&self) -> &AuditOptions {
        &self.options
    }

    /// Parses the artifact and audits `snapshot` against it.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Artifact`] when the artifact cannot be read or no
    /// period is known. Snapshot and seed problems are reported per level.
    pub fn audit_bytes(&self, artifact: &[u8], snapshot: &[u8]) -> Result<AuditReport, CoreError> {
        let artifact = ResultArtifact::from_bytes(artifact)?;
        self.audit(&artifact, snapshot)
    }

    /// Audits `snapshot` against an already-parsed artifact.
    pub fn audit(
        &self,
        artifact: &ResultArtifact,
        snapshot: &[u8],
    ) -> Result<AuditReport, CoreError> {
        let period = artifact.resolve_period(self.options.period_fallback.as_deref())?;
        tracing::debug!(%period, levels = ?self.options.levels, "audit started");

        let mut stop = false;

        let integrity = if !self.options.selects(Level::Integrity) {
            LevelOutcome::Skipped(SkipReason::NotSelected)
        } else {
            let report = check_integrity(snapshot, artifact.published_hash());
            if !report.is_match() {
                tracing::warn!(
                    expected = %report.expected,
                    computed = %report.computed,
                    "snapshot integrity mismatch"
                );
                stop = !self.options.continue_on_failure;
            }
            LevelOutcome::Completed(report)
        };

        // Parse once for Levels 2 and 3, and only if either will run.
        let wants_records = !stop
            && (self.options.selects(Level::Coherence)
                || self.options.selects(Level::Reproduction));
        let records: Option<Result<Vec<Record>, LevelError>> =
            wants_records.then(|| parse_snapshot(snapshot).map_err(LevelError::from));

        let coherence = if !self.options.selects(Level::Coherence) {
            LevelOutcome::Skipped(SkipReason::NotSelected)
        } else if stop {
            LevelOutcome::Skipped(SkipReason::EarlierFailure)
        } else {
            match &records {
                Some(Ok(records)) => {
                    let set = RecordSet::new(period.clone(), records.clone());
                    let report = check_records(&set, artifact);
                    if !report.is_match() {
                        tracing::warn!(failures = ?report.failures(), "snapshot coherence mismatch");
                        stop = !self.options.continue_on_failure;
                    }
                    LevelOutcome::Completed(report)
                }
                Some(Err(err)) => {
                    tracing::warn!(error = %err, "snapshot could not be parsed");
                    stop = !self.options.continue_on_failure;
                    LevelOutcome::Errored(err.clone())
                }
                None => LevelOutcome::Skipped(SkipReason::EarlierFailure),
            }
        };

        let reproduction = if !self.options.selects(Level::Reproduction) {
            LevelOutcome::Skipped(SkipReason::NotSelected)
        } else if stop {
            LevelOutcome::Skipped(SkipReason::EarlierFailure)
        } else {
            self.reproduce(artifact, &period, records.as_ref())
        };

        Ok(AuditReport {
            period,
            integrity,
            coherence,
            reproduction,
        })
    }

    fn reproduce(
        &self,
        artifact: &ResultArtifact,
        period: &str,
        records: Option<&Result<Vec<Record>, LevelError>>,
    ) -> LevelOutcome<ReproductionReport> {
        let seed_hex = self
            .options
            .seed_override
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| artifact.seed_hex());

        let seed = match seed_hex.map(Seed::from_hex).transpose() {
            Ok(Some(seed)) => seed,
            Ok(None) => {
                tracing::debug!("seed not revealed; reproduction unavailable");
                return LevelOutcome::Completed(ReproductionReport::unavailable(
                    artifact.k_primary,
                    artifact.k_alternates,
                ));
            }
            Err(err) => return LevelOutcome::Errored(LevelError::from(err)),
        };

        let records = match records {
            Some(Ok(records)) => records,
            Some(Err(err)) => return LevelOutcome::Errored(err.clone()),
            None => return LevelOutcome::Skipped(SkipReason::EarlierFailure),
        };

        let report = check_reproduction(
            &seed,
            period,
            records,
            artifact.k_primary,
            artifact.k_alternates,
            &artifact.published_aliases(),
        );
        if report.outcome.is_mismatch() {
            tracing::warn!(outcome = ?report.outcome, "winner reproduction mismatch");
        }
        LevelOutcome::Completed(report)
    }
}
