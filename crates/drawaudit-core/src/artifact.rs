//! Published result artifact (`winners.json`).
//!
//! Every field is optional on the wire; absent or `null` values fall back to
//! typed defaults so that an incomplete artifact still yields verdicts
//! (usually mismatches) rather than a parse failure. Counts may be published
//! as integers or decimal strings, and winner entries that are not objects
//! are ignored.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::errors::ArtifactError;
use crate::seed::Seed;

/// Reads a count published as a JSON number or a decimal string.
///
/// `null`, empty, negative and unreadable values count as 0; fractional
/// numbers truncate.
fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Null => Some(0),
        Value::Bool(b) => Some(u64::from(*b)),
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_i64().map(|_| 0))
            .or_else(|| n.as_f64().map(|f| f as u64)),
        Value::String(s) if s.trim().is_empty() => Some(0),
        Value::String(s) => s
            .trim()
            .parse::<i128>()
            .ok()
            .map(|n| u64::try_from(n.max(0)).unwrap_or(u64::MAX)),
        Value::Array(_) | Value::Object(_) => None,
    };
    Ok(parsed.unwrap_or_else(|| {
        tracing::warn!(%value, "unreadable count in artifact; using 0");
        0
    }))
}

/// Keeps only object entries of a winner list; anything else reads as empty.
fn winner_list<'de, D>(deserializer: D) -> Result<Vec<Winner>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .map(|item| serde_json::from_value(item).map_err(D::Error::custom))
            .collect(),
        _ => Ok(Vec::new()),
    }
}

/// Totals block; a non-object reads as all zeros.
fn totals_block<'de, D>(deserializer: D) -> Result<Totals, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value).map_err(D::Error::custom),
        _ => Ok(Totals::default()),
    }
}

/// Distinguishes a present `alias` key from an absent one.
///
/// A present key that is `null` or not a string yields `Some(None)`.
fn present_alias<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    }))
}

/// Aggregate totals the operator declares for the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Number of snapshot rows.
    #[serde(default, deserialize_with = "count")]
    pub users: u64,
    /// Sum of non-negative weights.
    #[serde(default, deserialize_with = "count")]
    pub entries: u64,
}

/// One published winner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Winner {
    /// Display alias of the winning identity.
    ///
    /// `None` when the entry has no `alias` key. `Some(None)` when the key is
    /// present but `null` (or not a string): such a slot still counts as a
    /// published winner and never matches.
    #[serde(
        default,
        deserialize_with = "present_alias",
        skip_serializing_if = "Option::is_none"
    )]
    pub alias: Option<Option<String>>,
    /// Any other published fields (rank, prize, ...), kept for reporting.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Commitment block; `seed_hex` appears only after the reveal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    /// Revealed seed, hex encoded.
    #[serde(default)]
    pub seed_hex: Option<String>,
    /// Other commitment fields (e.g. the seed hash).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The operator's published result document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultArtifact {
    /// Draw period label.
    #[serde(default)]
    pub period: Option<String>,
    /// Published snapshot digest (lowercase hex).
    #[serde(default)]
    pub snapshot_hash_hex: Option<String>,
    /// Declared totals.
    #[serde(default, deserialize_with = "totals_block")]
    pub totals: Totals,
    /// Number of primary winners.
    #[serde(default, deserialize_with = "count")]
    pub k_primary: u64,
    /// Number of alternates.
    #[serde(default, deserialize_with = "count")]
    pub k_alternates: u64,
    /// Primary winners in published order.
    #[serde(default, deserialize_with = "winner_list")]
    pub winners_primary: Vec<Winner>,
    /// Alternates in published order.
    #[serde(default, deserialize_with = "winner_list")]
    pub winners_alternates: Vec<Winner>,
    /// Commitment block.
    #[serde(default)]
    pub commit: Option<Commit>,
    /// Legacy location of the revealed seed.
    #[serde(default)]
    pub seed_hex: Option<String>,
}

impl ResultArtifact {
    /// Parses artifact bytes (UTF-8 JSON).
    pub fn from_bytes(raw: &[u8]) -> Result<Self, ArtifactError> {
        let text = std::str::from_utf8(raw)?;
        Ok(serde_json::from_str(text)?)
    }

    /// Period from the artifact, falling back to the caller's value.
    ///
    /// Empty strings count as absent on both sides.
    pub fn resolve_period(&self, fallback: Option<&str>) -> Result<String, ArtifactError> {
        non_empty(self.period.as_deref())
            .or_else(|| fallback.map(str::trim).filter(|p| !p.is_empty()))
            .map(str::to_string)
            .ok_or(ArtifactError::MissingPeriod)
    }

    /// Published snapshot digest, or `""` when missing.
    pub fn published_hash(&self) -> &str {
        self.snapshot_hash_hex.as_deref().unwrap_or("")
    }

    /// `k_primary + k_alternates`.
    pub fn k_total(&self) -> u64 {
        self.k_primary.saturating_add(self.k_alternates)
    }

    /// Revealed seed hex: `commit.seed_hex` first, then legacy `seed_hex`.
    pub fn seed_hex(&self) -> Option<&str> {
        let nested = self.commit.as_ref().and_then(|c| c.seed_hex.as_deref());
        non_empty(nested).or_else(|| non_empty(self.seed_hex.as_deref()))
    }

    /// Decodes the revealed seed, if any.
    pub fn seed(&self) -> Result<Option<Seed>, crate::errors::SeedError> {
        self.seed_hex().map(Seed::from_hex).transpose()
    }

    /// Published aliases: primary winners then alternates, in order.
    ///
    /// Entries without an `alias` key are skipped. A `null` alias stays in
    /// place as `None`.
    pub fn published_aliases(&self) -> Vec<Option<String>> {
        self.winners_primary
            .iter()
            .chain(self.winners_alternates.iter())
            .filter_map(|w| w.alias.clone())
            .collect()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
