//! Console report formatting.

use drawaudit_canonical::short_hex;
use drawaudit_core::{
    CoherenceReport, IntegrityReport, LevelError, LevelOutcome, ReproductionOutcome,
    ReproductionReport, SkipReason,
};

use crate::commands::audit::MissingSeed;

const MISSING_SEED: &str = "seed is not revealed yet in winners.json.commit.seed_hex";

fn field(name: &str, value: impl std::fmt::Display) -> String {
    format!("  {:<13}: {}", name, value)
}

fn skipped(reason: SkipReason) -> Vec<String> {
    let why = match reason {
        SkipReason::NotSelected => "not selected",
        SkipReason::EarlierFailure => "earlier level failed",
    };
    vec![field("status", format!("⏭️  skipped - {}", why))]
}

fn errored(error: &LevelError) -> Vec<String> {
    vec![field("status", format!("❌ {}", error))]
}

/// Level 1 section.
pub fn integrity_lines(outcome: &LevelOutcome<IntegrityReport>) -> Vec<String> {
    let mut lines = vec!["[Level 1] Snapshot integrity".to_string()];
    match outcome {
        LevelOutcome::Completed(report) => {
            lines.push(field("expected", short_hex(&report.expected)));
            lines.push(field("computed", short_hex(report.computed.as_hex())));
            lines.push(field(
                "result",
                if report.is_match() {
                    "✅ MATCH"
                } else {
                    "❌ MISMATCH"
                },
            ));
        }
        LevelOutcome::Errored(err) => lines.extend(errored(err)),
        LevelOutcome::Skipped(reason) => lines.extend(skipped(*reason)),
    }
    lines
}

/// Level 2 section.
pub fn coherence_lines(outcome: &LevelOutcome<CoherenceReport>) -> Vec<String> {
    let mut lines = vec!["[Level 2] Structure & coherence".to_string()];
    match outcome {
        LevelOutcome::Completed(report) => {
            let totals = &report.totals;
            lines.push(field("rows", totals.actual_users));
            lines.push(field(
                "totals",
                format!(
                    "users={} entries={}  {}",
                    totals.actual_users,
                    totals.actual_entries,
                    if totals.status.is_match() {
                        "✅ match winners.json".to_string()
                    } else {
                        format!(
                            "❌ do not match winners.json (users={} entries={})",
                            totals.expected_users, totals.expected_entries
                        )
                    }
                ),
            ));
            lines.push(field(
                "ordering",
                match &report.order.violation {
                    None => "✅ canonical".to_string(),
                    Some(violation) => format!("❌ not canonical: {}", violation),
                },
            ));
            lines.push(field(
                "hash",
                if report.hash.status.is_match() {
                    "✅ canonical snapshot hash matches"
                } else {
                    "❌ canonical snapshot hash mismatch"
                },
            ));
            if report.duplicate_identities > 0 {
                lines.push(field(
                    "duplicates",
                    format!("ℹ️  {} repeated user_id rows", report.duplicate_identities),
                ));
            }
        }
        LevelOutcome::Errored(err) => lines.extend(errored(err)),
        LevelOutcome::Skipped(reason) => lines.extend(skipped(*reason)),
    }
    lines
}

/// Level 3 section.
pub fn reproduction_lines(
    outcome: &LevelOutcome<ReproductionReport>,
    policy: MissingSeed,
) -> Vec<String> {
    let mut lines = vec!["[Level 3] Reproduce winners".to_string()];
    let report = match outcome {
        LevelOutcome::Completed(report) => report,
        LevelOutcome::Errored(err) => {
            lines.extend(errored(err));
            return lines;
        }
        LevelOutcome::Skipped(reason) => {
            lines.extend(skipped(*reason));
            return lines;
        }
    };

    if report.outcome == ReproductionOutcome::Unavailable {
        lines.push(field(
            "status",
            match policy {
                MissingSeed::Error => format!("❌ {}", MISSING_SEED),
                MissingSeed::Warn => format!("⚠️  {}", MISSING_SEED),
                MissingSeed::Skip => format!("⏭️  skipped - {}", MISSING_SEED),
            },
        ));
        return lines;
    }

    lines.push(field(
        "seed_hex",
        short_hex(report.seed_hex.as_deref().unwrap_or("")),
    ));
    lines.push(field("k_primary", report.k_primary));
    lines.push(field("k_alternates", report.k_alternates));
    match &report.outcome {
        ReproductionOutcome::Match => lines.push(field("compare", "✅ aliases match")),
        ReproductionOutcome::SizeMismatch {
            computed,
            published,
        } => lines.push(field(
            "compare",
            format!(
                "❌ size mismatch (computed {} vs published {})",
                computed, published
            ),
        )),
        ReproductionOutcome::ContentMismatch { differences } => {
            lines.push(field("compare", "❌ first differences:"));
            for diff in differences {
                lines.push(format!(
                    "    idx {}: computed={} published={}",
                    diff.index,
                    diff.computed,
                    diff.published.as_deref().unwrap_or("null")
                ));
            }
        }
        ReproductionOutcome::Unavailable => {}
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use drawaudit_canonical::SnapshotDigest;
    use drawaudit_core::CheckStatus;

    #[test]
    fn integrity_section_abbreviates_digests() {
        let computed = SnapshotDigest::of(b"x");
        let report = IntegrityReport {
            expected: computed.as_hex().to_string(),
            computed: computed.clone(),
            status: CheckStatus::Match,
        };
        let lines = integrity_lines(&LevelOutcome::Completed(report));
        assert_eq!(lines[1], field("expected", short_hex(computed.as_hex())));
        assert!(lines[3].ends_with("✅ MATCH"));
    }

    #[test]
    fn unavailable_seed_follows_policy() {
        let outcome = LevelOutcome::Completed(ReproductionReport::unavailable(3, 1));
        let warn = reproduction_lines(&outcome, MissingSeed::Warn);
        assert!(warn[1].contains("⚠️"));
        let skip = reproduction_lines(&outcome, MissingSeed::Skip);
        assert!(skip[1].contains("skipped"));
    }
}
