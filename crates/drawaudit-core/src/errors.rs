use drawaudit_canonical::SnapshotError;
use serde::Serialize;
use thiserror::Error;

/// The result artifact could not be interpreted.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Artifact bytes are not UTF-8.
    #[error("artifact is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    /// Artifact is not JSON of the expected shape.
    #[error("artifact JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Neither the artifact nor the caller supplied a period.
    #[error("unable to determine period (not in artifact and not provided by caller)")]
    MissingPeriod,
}

/// A revealed seed could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeedError {
    /// The seed is not an even-length hex string.
    #[error("seed_hex is not valid hex: {reason}")]
    InvalidHex {
        /// Decoder message.
        reason: String,
    },
}

/// Reason a level could not produce a verdict at all.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum LevelError {
    /// Snapshot bytes could not be parsed.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    /// Seed could not be decoded.
    #[error(transparent)]
    Seed(#[from] SeedError),
}

/// Core error types.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Artifact could not be read.
    #[error("invalid artifact: {0}")]
    Artifact(#[from] ArtifactError),
    /// A level could not run.
    #[error(transparent)]
    Level(#[from] LevelError),
}
