//! Audit command implementation.

use clap::ValueEnum;
use drawaudit_core::{AuditOptions, AuditReport, Auditor, Failure, Level, ResultArtifact};
use serde::Serialize;
use serde_json::json;

use crate::output;
use crate::source::{read_bytes, Sources};

/// Which levels to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LevelArg {
    /// Levels 1, 2 and 3.
    All,
    /// Snapshot integrity only.
    #[value(name = "1")]
    One,
    /// Structure and coherence only.
    #[value(name = "2")]
    Two,
    /// Winner reproduction only.
    #[value(name = "3")]
    Three,
}

impl LevelArg {
    fn levels(self) -> Vec<Level> {
        match self {
            LevelArg::All => Level::ALL.to_vec(),
            LevelArg::One => vec![Level::Integrity],
            LevelArg::Two => vec![Level::Coherence],
            LevelArg::Three => vec![Level::Reproduction],
        }
    }
}

/// What an unrevealed seed means for the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingSeed {
    /// Fail with exit code 4.
    Error,
    /// Report as skipped.
    Skip,
    /// Report a warning and succeed.
    Warn,
}

/// Process exit codes.
pub mod exit {
    /// All selected levels passed.
    pub const OK: i32 = 0;
    /// Usage, I/O or parse error.
    pub const ERROR: i32 = 1;
    /// Level 1 mismatch.
    pub const INTEGRITY: i32 = 2;
    /// Level 2 mismatch.
    pub const COHERENCE: i32 = 3;
    /// Seed missing under `--on-missing-seed error`.
    pub const SEED_MISSING: i32 = 4;
    /// Level 3 size mismatch.
    pub const REPRODUCTION_SIZE: i32 = 5;
    /// Level 3 content mismatch.
    pub const REPRODUCTION_CONTENT: i32 = 6;
}

/// Arguments for a single audit run.
#[derive(Debug, Clone)]
pub struct AuditArgs {
    pub period: Option<String>,
    pub base: Option<String>,
    pub winners: Option<String>,
    pub snapshot: Option<String>,
    pub level: LevelArg,
    pub on_missing_seed: MissingSeed,
    pub seed_hex: Option<String>,
    pub keep_going: bool,
    pub json: bool,
    pub quiet: bool,
}

/// Maps a report to the process exit status.
pub fn exit_code(report: &AuditReport, policy: MissingSeed) -> i32 {
    match report.first_failure() {
        Some(Failure::IntegrityMismatch) => exit::INTEGRITY,
        Some(Failure::CoherenceMismatch) => exit::COHERENCE,
        Some(Failure::ReproductionSizeMismatch) => exit::REPRODUCTION_SIZE,
        Some(Failure::ReproductionContentMismatch) => exit::REPRODUCTION_CONTENT,
        Some(Failure::LevelError(_)) => exit::ERROR,
        None if report.seed_unavailable() && policy == MissingSeed::Error => exit::SEED_MISSING,
        None => exit::OK,
    }
}

pub fn run(args: AuditArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let sources = Sources::resolve(
        args.winners.clone(),
        args.snapshot.clone(),
        args.base.as_deref(),
        args.period.as_deref(),
    )?;

    if !args.quiet && !args.json {
        println!("== Draw Audit ==");
        if let Some(period) = &args.period {
            println!("Period         : {}", period);
        }
        if let Some(base) = &args.base {
            println!("Base           : {}", base);
        }
        println!("Mode           : {}\n", sources.mode());
    }

    let artifact = ResultArtifact::from_bytes(&read_bytes(&sources.winners)?)?;
    let snapshot = read_bytes(&sources.snapshot)?;

    let auditor = Auditor::new(AuditOptions {
        levels: args.level.levels(),
        continue_on_failure: args.keep_going,
        period_fallback: args.period.clone(),
        seed_override: args.seed_hex.clone(),
    });
    let report = auditor.audit(&artifact, &snapshot)?;
    let code = exit_code(&report, args.on_missing_seed);

    if args.json {
        let document = json!({
            "audited_at": chrono::Utc::now().to_rfc3339(),
            "sources": { "winners": sources.winners, "snapshot": sources.snapshot },
            "on_missing_seed": args.on_missing_seed,
            "report": report,
            "exit_code": code,
        });
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        print_report(&report, args.level, args.on_missing_seed);
    }

    if code != exit::OK {
        tracing::warn!(exit_code = code, failure = ?report.first_failure(), "audit failed");
    }
    Ok(code)
}

fn print_report(report: &AuditReport, level: LevelArg, policy: MissingSeed) {
    let selected = level.levels();
    let mut sections = Vec::new();
    if selected.contains(&Level::Integrity) {
        sections.push(output::integrity_lines(&report.integrity));
    }
    if selected.contains(&Level::Coherence) {
        sections.push(output::coherence_lines(&report.coherence));
    }
    if selected.contains(&Level::Reproduction) {
        sections.push(output::reproduction_lines(&report.reproduction, policy));
    }
    for section in sections {
        for line in section {
            println!("{}", line);
        }
        println!();
    }
}
