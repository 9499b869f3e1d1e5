//! Canonical primitives for auditing a published weighted draw.
//!
//! Everything that participates in hashing or in reproducing the draw lives
//! in this crate: the snapshot record model, the CSV snapshot parser, the
//! canonical snapshot encoding, the ordering contract, and the seeded
//! per-record derivation used to rank candidates.
//!
//! All hashing uses BLAKE2b with a 32-byte output. The three uses of the hash
//! are domain-separated by fixed literal prefixes:
//! - whole-file integrity hashes the raw snapshot bytes,
//! - the canonical snapshot stream starts with `snapshot|ver:1|`,
//! - per-record derivation starts with `derive_u|ver:1|`.
//!
#![deny(missing_docs)]

/// Display aliases and short hex rendering.
pub mod alias;
/// Canonical snapshot encoding and hashing.
pub mod canonicalizer;
/// Seeded per-record score derivation.
pub mod derive;
/// Digest primitives.
pub mod digest;
/// Canonical ordering contract.
pub mod ordering;
/// Snapshot records.
pub mod record;
/// CSV snapshot parsing.
pub mod snapshot;
/// Validation helpers used by canonical types.
pub mod validation;

pub use alias::{display_alias, short_hex};
pub use canonicalizer::{canonical_snapshot_hash, encode_snapshot, SNAPSHOT_DOMAIN_SEPARATOR};
pub use derive::{derive_u, digest_to_unit, score, DERIVE_DOMAIN_SEPARATOR};
pub use digest::{blake2b_256, SnapshotDigest};
pub use ordering::{validate_canonical_order, OrderViolation, ViolationKind};
pub use record::{Record, RecordSet};
pub use snapshot::{parse_snapshot, SnapshotError, REQUIRED_COLUMNS};
pub use validation::ValidationError;
