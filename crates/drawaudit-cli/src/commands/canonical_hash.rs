//! Canonical-hash command implementation.

use drawaudit_canonical::{canonical_snapshot_hash, parse_snapshot, validate_canonical_order};

use crate::source::read_bytes;

pub fn run(snapshot: String, period: String) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = read_bytes(&snapshot)?;
    let records = parse_snapshot(&bytes).map_err(|e| format!("Invalid snapshot: {}", e))?;

    if let Err(violation) = validate_canonical_order(&records) {
        eprintln!("warning: snapshot is not in canonical order: {}", violation);
    }

    println!("{}", canonical_snapshot_hash(period.trim(), &records));
    Ok(())
}
