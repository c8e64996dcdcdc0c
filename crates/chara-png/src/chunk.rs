//! PNG chunk types.

use std::fmt;

use chara_common::crc;
use zerocopy::byteorder::{BigEndian, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Largest data length a chunk may declare (2^31 - 1).
pub const MAX_CHUNK_LEN: usize = 0x7FFF_FFFF;

/// A four-byte PNG chunk type code such as `IHDR` or `tEXt`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    /// Image header, always the first chunk.
    pub const IHDR: ChunkType = ChunkType(*b"IHDR");
    /// Image data.
    pub const IDAT: ChunkType = ChunkType(*b"IDAT");
    /// Image trailer, always the last chunk.
    pub const IEND: ChunkType = ChunkType(*b"IEND");
    /// Uncompressed Latin-1 text.
    pub const TEXT: ChunkType = ChunkType(*b"tEXt");

    /// Get the raw type bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Whether decoders may skip this chunk (lowercase first letter).
    #[inline]
    pub const fn is_ancillary(&self) -> bool {
        self.0[0] & 0x20 != 0
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({})", self)
    }
}

/// On-disk chunk prefix: length then type.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub(crate) struct ChunkHeader {
    pub length: U32<BigEndian>,
    pub kind: [u8; 4],
}

impl ChunkHeader {
    pub(crate) fn new(length: u32, kind: ChunkType) -> Self {
        Self {
            length: U32::new(length),
            kind: kind.0,
        }
    }
}

/// A single PNG chunk.
///
/// The CRC is whatever was read from the file for parsed chunks, and is
/// computed from type and data for chunks built with [`Chunk::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    kind: ChunkType,
    data: Vec<u8>,
    crc: u32,
}

impl Chunk {
    /// Build a new chunk, computing its CRC.
    pub fn new(kind: ChunkType, data: Vec<u8>) -> Self {
        let crc = crc::chunk_crc(&kind.0, &data);
        Self { kind, data, crc }
    }

    /// Build a chunk with a CRC taken as-is from a file.
    pub fn with_crc(kind: ChunkType, data: Vec<u8>, crc: u32) -> Self {
        Self { kind, data, crc }
    }

    /// Get the chunk type.
    #[inline]
    pub fn kind(&self) -> ChunkType {
        self.kind
    }

    /// Get the chunk data.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the stored CRC.
    #[inline]
    pub fn crc(&self) -> u32 {
        self.crc
    }

    /// Length of the chunk data in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the chunk carries no data.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Size of the chunk on disk, including length, type and CRC.
    #[inline]
    pub fn encoded_len(&self) -> usize {
        12 + self.data.len()
    }

    /// Compute the CRC that type and data should carry.
    pub fn computed_crc(&self) -> u32 {
        crc::chunk_crc(&self.kind.0, &self.data)
    }

    /// Check the stored CRC against type and data.
    pub fn verify_crc(&self) -> bool {
        self.crc == self.computed_crc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_type_display() {
        assert_eq!(ChunkType::TEXT.to_string(), "tEXt");
        assert_eq!(ChunkType(*b"ab\0d").to_string(), "ab\\x00d");
    }

    #[test]
    fn test_ancillary_bit() {
        assert!(ChunkType::TEXT.is_ancillary());
        assert!(!ChunkType::IHDR.is_ancillary());
        assert!(!ChunkType::IEND.is_ancillary());
    }

    #[test]
    fn test_new_chunk_has_valid_crc() {
        let chunk = Chunk::new(ChunkType::IEND, Vec::new());
        assert_eq!(chunk.crc(), 0xAE42_6082);
        assert!(chunk.verify_crc());
        assert_eq!(chunk.encoded_len(), 12);
    }

    #[test]
    fn test_preserved_crc_is_not_recomputed() {
        let chunk = Chunk::with_crc(ChunkType::IEND, Vec::new(), 0xDEAD_BEEF);
        assert_eq!(chunk.crc(), 0xDEAD_BEEF);
        assert!(!chunk.verify_crc());
    }

    #[test]
    fn test_header_layout() {
        let header = ChunkHeader::new(13, ChunkType::IHDR);
        assert_eq!(header.as_bytes(), &[0, 0, 0, 13, b'I', b'H', b'D', b'R']);
        assert_eq!(std::mem::size_of::<ChunkHeader>(), 8);
    }
}
