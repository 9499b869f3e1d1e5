use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::LevelError;

/// Audit levels, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Level 1: whole-file snapshot integrity.
    Integrity,
    /// Level 2: structure and coherence with published totals.
    Coherence,
    /// Level 3: reproduction of the winner list.
    Reproduction,
}

impl Level {
    /// All levels in run order.
    pub const ALL: [Level; 3] = [Level::Integrity, Level::Coherence, Level::Reproduction];

    /// 1-based level number used in reports.
    pub fn number(self) -> u8 {
        match self {
            Level::Integrity => 1,
            Level::Coherence => 2,
            Level::Reproduction => 3,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level {}", self.number())
    }
}

/// Outcome of a single comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Computed and published values agree.
    Match,
    /// Computed and published values differ.
    Mismatch,
}

impl CheckStatus {
    /// `Match` when `ok` holds.
    pub fn from_bool(ok: bool) -> Self {
        if ok {
            CheckStatus::Match
        } else {
            CheckStatus::Mismatch
        }
    }

    /// Whether this is a match.
    pub fn is_match(self) -> bool {
        self == CheckStatus::Match
    }
}

/// Why a level produced no verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The caller did not ask for this level.
    NotSelected,
    /// An earlier level failed and the run is fail-fast.
    EarlierFailure,
}

/// What happened to one level during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum LevelOutcome<T> {
    /// The level ran and produced a verdict.
    Completed(T),
    /// The level could not run on the given inputs.
    Errored(LevelError),
    /// The level did not run.
    Skipped(SkipReason),
}

impl<T> LevelOutcome<T> {
    /// The verdict, when the level ran.
    pub fn verdict(&self) -> Option<&T> {
        match self {
            LevelOutcome::Completed(v) => Some(v),
            _ => None,
        }
    }

    /// The error, when the level could not run.
    pub fn error(&self) -> Option<&LevelError> {
        match self {
            LevelOutcome::Errored(e) => Some(e),
            _ => None,
        }
    }
}
