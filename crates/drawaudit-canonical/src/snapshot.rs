//! Snapshot CSV parsing.
//!
//! The parser only turns bytes into typed records. It never re-sorts, never
//! deduplicates, and performs no coherence checks; those belong to the
//! ordering module and to the audit levels.

use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::Record;

/// Columns every snapshot header must name.
pub const REQUIRED_COLUMNS: [&str; 3] = ["shard", "user_id", "weight"];

const BOM: char = '\u{feff}';

/// Errors produced while parsing a snapshot.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SnapshotError {
    /// Required structure is missing (undecodable bytes, unreadable header,
    /// missing columns).
    #[error("snapshot format error: {message}")]
    Format {
        /// What is missing or unreadable.
        message: String,
    },
    /// A data row could not be converted to its required types.
    #[error("invalid row at csv line {line}: {reason}")]
    Row {
        /// Record number as a line: the header is line 1 and data rows
        /// count from 2. Blank lines are not counted.
        line: u64,
        /// What failed to convert.
        reason: String,
    },
}

struct Columns {
    shard: usize,
    identity: usize,
    weight: usize,
}

impl Columns {
    fn locate(names: &[String]) -> Result<Self, SnapshotError> {
        // Later duplicates of a header name shadow earlier ones.
        let find = |name: &str| names.iter().rposition(|h| h == name);
        match (find("shard"), find("user_id"), find("weight")) {
            (Some(shard), Some(identity), Some(weight)) => Ok(Self {
                shard,
                identity,
                weight,
            }),
            _ => Err(SnapshotError::Format {
                message: format!(
                    "snapshot.csv must contain columns: {}",
                    REQUIRED_COLUMNS.join(",")
                ),
            }),
        }
    }
}

/// Parses raw snapshot bytes into records, in file order.
///
/// # Errors
///
/// Returns [`SnapshotError::Format`] if the bytes are not UTF-8, the header
/// cannot be read, or a required column is missing (a leading BOM is not
/// stripped, so `\u{feff}shard` does not name `shard`), and
/// [`SnapshotError::Row`] for the first row whose fields fail to convert.
pub fn parse_snapshot(raw: &[u8]) -> Result<Vec<Record>, SnapshotError> {
    let text = std::str::from_utf8(raw).map_err(|e| SnapshotError::Format {
        message: format!("snapshot is not valid UTF-8: {}", e),
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut names: Vec<String> = reader
        .headers()
        .map_err(|e| SnapshotError::Format {
            message: format!("unreadable header: {}", e),
        })?
        .iter()
        .map(str::to_string)
        .collect();
    // The reader drops a leading BOM; it stays part of the first column name.
    if text.starts_with(BOM) {
        if let Some(first) = names.first_mut().filter(|n| !n.starts_with(BOM)) {
            first.insert(0, BOM);
        }
    }
    let columns = Columns::locate(&names)?;

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let line = index as u64 + 2;
        let row = row.map_err(|e| SnapshotError::Row {
            line,
            reason: e.to_string(),
        })?;
        records.push(parse_row(&row, &columns, line)?);
    }
    Ok(records)
}

fn parse_row(row: &StringRecord, columns: &Columns, line: u64) -> Result<Record, SnapshotError> {
    let field = |idx: usize, name: &str| {
        row.get(idx).ok_or_else(|| SnapshotError::Row {
            line,
            reason: format!("missing field '{}'", name),
        })
    };

    let shard = parse_integer::<u64>(field(columns.shard, "shard")?, "shard", line)?;
    let identity = field(columns.identity, "user_id")?.to_string();
    let weight = parse_integer::<i64>(field(columns.weight, "weight")?, "weight", line)?;

    Ok(Record {
        shard,
        identity,
        weight,
    })
}

fn parse_integer<T: FromStr>(raw: &str, name: &str, line: u64) -> Result<T, SnapshotError>
where
    T::Err: std::fmt::Display,
{
    raw.trim_matches(|c: char| c.is_ascii_whitespace())
        .parse::<T>()
        .map_err(|e| SnapshotError::Row {
            line,
            reason: format!("{} '{}' is not a valid integer: {}", name, raw, e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_in_file_order() {
        let raw = b"shard,user_id,weight\n2,b,1\n1,a,5\n";
        let records = parse_snapshot(raw).unwrap();
        assert_eq!(records, vec![Record::new(2, "b", 1), Record::new(1, "a", 5)]);
    }

    #[test]
    fn tolerates_padding_around_integers() {
        let raw = b"shard,user_id,weight\n 3 , x ,+7\n";
        let records = parse_snapshot(raw).unwrap();
        assert_eq!(records, vec![Record::new(3, " x ", 7)]);
    }
}
