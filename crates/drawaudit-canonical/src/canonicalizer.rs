//! Canonical snapshot encoding.
//!
//! Layout (all text UTF-8, integers in decimal ASCII):
//!
//! ```text
//! snapshot|ver:1|period:<period>
//! |shard:<shard>|user:<identity>|w:<weight>\n      (once per record, in order)
//! ```
//!
//! The digest of this stream is what an operator publishes as the snapshot
//! hash, so the bytes must never change for a given `ver`.

use blake2::Digest as _;

use crate::digest::{Blake2b256, SnapshotDigest};
use crate::record::Record;

/// Domain separator and version tag that opens every canonical stream.
pub const SNAPSHOT_DOMAIN_SEPARATOR: &[u8] = b"snapshot|ver:1|";

trait Sink {
    fn put(&mut self, bytes: &[u8]);
}

impl Sink for Vec<u8> {
    fn put(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

impl Sink for Blake2b256 {
    fn put(&mut self, bytes: &[u8]) {
        self.update(bytes);
    }
}

fn write_stream<S: Sink>(sink: &mut S, period: &str, records: &[Record]) {
    sink.put(SNAPSHOT_DOMAIN_SEPARATOR);
    sink.put(b"period:");
    sink.put(period.as_bytes());
    for record in records {
        sink.put(b"|shard:");
        sink.put(record.shard.to_string().as_bytes());
        sink.put(b"|user:");
        sink.put(record.identity.as_bytes());
        sink.put(b"|w:");
        sink.put(record.weight.to_string().as_bytes());
        sink.put(b"\n");
    }
}

/// Returns the canonical byte stream for `(period, records)`.
///
/// Mostly useful for diagnostics; [`canonical_snapshot_hash`] hashes the same
/// stream without materialising it.
pub fn encode_snapshot(period: &str, records: &[Record]) -> Vec<u8> {
    let mut out = Vec::new();
    write_stream(&mut out, period, records);
    out
}

/// Computes the canonical snapshot digest for `(period, records)`.
///
/// # Example
///
/// ```rust
/// use drawaudit_canonical::{canonical_snapshot_hash, encode_snapshot, Record, SnapshotDigest};
///
/// let records = vec![Record::new(1, "a", 5), Record::new(1, "b", 3)];
/// let digest = canonical_snapshot_hash("2025-01", &records);
/// assert_eq!(digest, SnapshotDigest::of(&encode_snapshot("2025-01", &records)));
/// ```
pub fn canonical_snapshot_hash(period: &str, records: &[Record]) -> SnapshotDigest {
    let mut hasher = Blake2b256::new();
    write_stream(&mut hasher, period, records);
    SnapshotDigest::from_bytes(hasher.finalize().into())
}
