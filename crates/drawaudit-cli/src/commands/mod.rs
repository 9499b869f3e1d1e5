pub mod audit;
pub mod canonical_hash;
pub mod hash;
