//! Seeded per-record derivation for Efraimidis–Spirakis ranking.
//!
//! `u = H("derive_u|ver:1|" || seed || "|period:" || period || "|shard:" ||
//! shard || "|user:" || identity)` read as a big-endian 256-bit integer and
//! scaled into `[0, 1)`. The conversion to `f64` is correctly rounded
//! (round-half-to-even), and an exact zero is clamped to the smallest
//! positive subnormal so the logarithm stays finite.

use blake2::Digest as _;

use crate::digest::Blake2b256;

/// Domain separator and version tag for score derivation.
pub const DERIVE_DOMAIN_SEPARATOR: &[u8] = b"derive_u|ver:1|";

/// Smallest positive subnormal `f64` (`5e-324`).
const MIN_POSITIVE_SUBNORMAL: f64 = 5e-324;

const DIGEST_BITS: usize = 256;
const MANTISSA_BITS: usize = 53;

/// Derives the pseudo-uniform value for one candidate.
pub fn derive_u(seed: &[u8], period: &str, shard: u64, identity: &str) -> f64 {
    let mut hasher = Blake2b256::new();
    hasher.update(DERIVE_DOMAIN_SEPARATOR);
    hasher.update(seed);
    hasher.update(b"|period:");
    hasher.update(period.as_bytes());
    hasher.update(b"|shard:");
    hasher.update(shard.to_string().as_bytes());
    hasher.update(b"|user:");
    hasher.update(identity.as_bytes());
    let digest: [u8; 32] = hasher.finalize().into();

    let u = digest_to_unit(&digest);
    if u <= 0.0 {
        MIN_POSITIVE_SUBNORMAL
    } else {
        u
    }
}

/// Exponential key for a candidate: lower is better.
pub fn score(u: f64, weight: i64) -> f64 {
    -u.ln() / weight as f64
}

/// Maps a big-endian 256-bit integer `n` to `n / 2^256` as an `f64`.
///
/// `n` is first rounded to the nearest `f64` (ties to even); the division
/// by a power of two is then exact.
pub fn digest_to_unit(digest: &[u8; 32]) -> f64 {
    let bit = |i: usize| (digest[i / 8] >> (7 - i % 8)) & 1 == 1;

    let leading = match (0..DIGEST_BITS).find(|&i| bit(i)) {
        Some(first) => first,
        None => return 0.0,
    };
    let significant = DIGEST_BITS - leading;

    let take = significant.min(MANTISSA_BITS);
    let mut mantissa = (leading..leading + take).fold(0u64, |acc, i| (acc << 1) | bit(i) as u64);
    let dropped = significant - take;

    if dropped > 0 {
        let round = bit(leading + take);
        let sticky = (leading + take + 1..DIGEST_BITS).any(bit);
        if round && (sticky || mantissa & 1 == 1) {
            // May carry to 2^53, which is still exact as an f64.
            mantissa += 1;
        }
    }

    mantissa as f64 * pow2(dropped as i32 - DIGEST_BITS as i32)
}

/// `2^exp` for exponents in the normal range.
fn pow2(exp: i32) -> f64 {
    debug_assert!((-1022..=1023).contains(&exp));
    f64::from_bits(((exp + 1023) as u64) << 52)
}
