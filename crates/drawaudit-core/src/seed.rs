use crate::errors::SeedError;

/// Revealed draw seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed(Vec<u8>);

impl Seed {
    /// Decodes a hex seed. Surrounding whitespace and uppercase digits are accepted.
    pub fn from_hex(value: &str) -> Result<Self, SeedError> {
        hex::decode(value.trim())
            .map(Self)
            .map_err(|e| SeedError::InvalidHex {
                reason: e.to_string(),
            })
    }

    /// Raw seed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}
