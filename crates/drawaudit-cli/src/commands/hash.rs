//! Hash command implementation.

use drawaudit_canonical::SnapshotDigest;

use crate::source::read_bytes;

pub fn run(input: String) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = read_bytes(&input)?;
    println!("{}", SnapshotDigest::of(&bytes));
    Ok(())
}
