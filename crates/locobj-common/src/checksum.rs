//! Object checksum.
//!
//! The checksum folds the low flags byte, the 8-byte name and the decoded
//! payload into a 32-bit value, one byte at a time, rotating by 11 bits
//! after each.

const CHECKSUM_SEED: u32 = 0xF369_A75B;

#[inline]
fn fold(checksum: u32, byte: u8) -> u32 {
    (checksum ^ byte as u32).rotate_left(11)
}

/// Compute the checksum of an object from its header parts and payload.
pub fn object_checksum(flags_low: u8, name: &[u8; 8], data: &[u8]) -> u32 {
    let checksum = fold(CHECKSUM_SEED, flags_low);
    let checksum = name.iter().fold(checksum, |acc, &b| fold(acc, b));
    data.iter().fold(checksum, |acc, &b| fold(acc, b))
}
