use serde::{Deserialize, Serialize};

/// One row of an eligibility snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Partition identifier; defines canonical order and keys derivation.
    pub shard: u64,
    /// Opaque participant identity, taken verbatim from the snapshot.
    pub identity: String,
    /// Number of entries. Negative values parse but never count.
    pub weight: i64,
}

impl Record {
    /// Builds a record.
    pub fn new(shard: u64, identity: impl Into<String>, weight: i64) -> Self {
        Self {
            shard,
            identity: identity.into(),
            weight,
        }
    }

    /// Weight as it counts toward entry totals: negative weights count as zero.
    pub fn entries(&self) -> u64 {
        self.weight.max(0) as u64
    }
}

/// Ordered records plus the period label they belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Period label (e.g. `2025-01`).
    pub period: String,
    /// Records in file order.
    pub records: Vec<Record>,
}

impl RecordSet {
    /// Builds a record set.
    pub fn new(period: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            period: period.into(),
            records,
        }
    }

    /// Number of rows.
    pub fn users(&self) -> u64 {
        self.records.len() as u64
    }

    /// Sum of non-negative weights.
    pub fn entries(&self) -> u128 {
        self.records.iter().map(|r| u128::from(r.entries())).sum()
    }
}
