use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Which ordering rule a record broke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ViolationKind {
    /// The shard is lower than the previous record's shard.
    ShardDecreased {
        /// Offending shard.
        shard: u64,
        /// Shard of the previous record.
        previous: u64,
    },
    /// Within one shard, the identity sorts before the previous identity.
    IdentityNotAscending {
        /// Shard both records belong to.
        shard: u64,
        /// Offending identity.
        identity: String,
        /// Identity of the previous record.
        previous: String,
    },
}

/// First violation of the canonical ordering contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderViolation {
    /// 0-based position of the offending record.
    pub index: usize,
    /// Rule that was broken.
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl fmt::Display for OrderViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::ShardDecreased { shard, previous } => write!(
                f,
                "row {}: shard decreased ({} < {})",
                self.index, shard, previous
            ),
            ViolationKind::IdentityNotAscending {
                shard,
                identity,
                previous,
            } => write!(
                f,
                "row {}: user_id not ascending within shard {} ('{}' < '{}')",
                self.index, shard, identity, previous
            ),
        }
    }
}

/// Checks the canonical ordering contract in one pass.
///
/// Shards must be non-decreasing; within a shard identities must be
/// non-decreasing by byte-wise comparison. Equal neighbours are accepted.
pub fn validate_canonical_order(records: &[Record]) -> Result<(), OrderViolation> {
    let mut last_shard: Option<u64> = None;
    let mut last_identity: Option<&str> = None;

    for (index, record) in records.iter().enumerate() {
        match last_shard {
            Some(previous) if record.shard < previous => {
                return Err(OrderViolation {
                    index,
                    kind: ViolationKind::ShardDecreased {
                        shard: record.shard,
                        previous,
                    },
                });
            }
            Some(previous) if record.shard == previous => {}
            _ => {
                last_shard = Some(record.shard);
                last_identity = None;
            }
        }

        if let Some(previous) = last_identity {
            if record.identity.as_bytes() < previous.as_bytes() {
                return Err(OrderViolation {
                    index,
                    kind: ViolationKind::IdentityNotAscending {
                        shard: record.shard,
                        identity: record.identity.clone(),
                        previous: previous.to_string(),
                    },
                });
            }
        }
        last_identity = Some(&record.identity);
    }
    Ok(())
}
