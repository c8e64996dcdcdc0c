//! PNG CRC-32 utilities.
//!
//! PNG chunks carry a CRC-32 (the ISO 3309 polynomial, same as zlib) computed
//! over the chunk type and chunk data, but not the length field.

/// Compute the CRC of a PNG chunk from its type and data.
#[inline]
pub fn chunk_crc(kind: &[u8; 4], data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(kind);
    hasher.update(data);
    hasher.finalize()
}
