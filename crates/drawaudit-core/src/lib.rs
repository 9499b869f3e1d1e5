//! Verification engine for published weighted draw results.
//!
//! This crate provides:
//! - The result artifact schema (`winners.json`) with seed lookup
//! - Level 1: whole-file snapshot integrity
//! - Level 2: ordering, totals and canonical-hash coherence
//! - Level 3: reproduction of the winner list from the revealed seed
//! - An [`Auditor`] that runs the levels fail-fast or exhaustively
//!
//! Core invariants:
//! - Inputs are whole in-memory buffers; the engine does no I/O
//! - Every level returns a structured verdict, never a process exit
//! - A seed that has not been revealed is `Unavailable`, not an error
//! - Runs share no state and may execute in parallel
//!
//! ## Quick Start
//!
//! ```rust
//! use drawaudit_core::{AuditOptions, Auditor, Level};
//!
//! let snapshot = b"shard,user_id,weight\n1,a,5\n1,b,3\n2,a,1\n";
//! let artifact = br#"{
//!     "period": "2025-01",
//!     "snapshot_hash_hex": "07690e182bf3849d30541e7b8cb8d92847d699fc7b77611bc6bc9d6c81538c56",
//!     "totals": {"users": 3, "entries": 9}
//! }"#;
//!
//! let auditor = Auditor::new(AuditOptions::only(Level::Integrity));
//! let report = auditor.audit_bytes(artifact, snapshot)?;
//! assert!(report.passed());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
#![deny(missing_docs)]

/// Artifact schema.
pub mod artifact;
/// Audit orchestration.
pub mod audit;
/// Level 2 coherence checks.
pub mod coherence;
/// Error types for core operations.
pub mod errors;
/// Level 1 integrity check.
pub mod integrity;
/// Level 3 winner reproduction.
pub mod reproduction;
/// Revealed seed.
pub mod seed;
/// Verdict and outcome types shared by all levels.
pub mod verdict;

pub use artifact::{Commit, ResultArtifact, Totals, Winner};
pub use audit::{AuditOptions, AuditReport, Auditor, Failure};
pub use coherence::{
    check_coherence, check_records, CoherenceFailure, CoherenceReport, HashCheck, OrderCheck,
    TotalsCheck,
};
pub use errors::{ArtifactError, CoreError, LevelError, SeedError};
pub use integrity::{check_integrity, IntegrityReport};
pub use reproduction::{
    check_reproduction, compare_aliases, reproduce_winners, AliasDifference, ReproducedWinner,
    ReproductionOutcome, ReproductionReport,
};
pub use seed::Seed;
pub use verdict::{CheckStatus, Level, LevelOutcome, SkipReason};
