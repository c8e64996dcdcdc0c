//! PNG chunk sequence parsing and serialization.

use chara_common::{BinaryReader, IntoBytes};

use crate::chunk::ChunkHeader;
use crate::{Chunk, ChunkType, Error, Result, TextChunk, MAX_CHUNK_LEN};

/// The 8-byte PNG file signature.
pub const SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";

/// A PNG file as an ordered list of chunks.
///
/// Parsing and serializing are lossless: `Png::parse(b)?.to_bytes()? == b`
/// for any well-formed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Png {
    chunks: Vec<Chunk>,
}

impl Png {
    /// Build a PNG from chunks without structural checks.
    pub fn from_chunks(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    /// Parse a PNG file into its chunks.
    ///
    /// Checks the signature, that the first chunk is `IHDR` and that the last
    /// is `IEND`. CRCs are kept as read and not verified.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);

        reader.expect_magic(SIGNATURE).map_err(|_| Error::InvalidSignature {
            actual: data[..data.len().min(SIGNATURE.len())].to_vec(),
        })?;

        let mut chunks: Vec<Chunk> = Vec::new();

        while !reader.is_empty() {
            let offset = reader.position();
            let chunk = read_chunk(&mut reader)
                .map_err(|source| Error::TruncatedChunk { offset, source })?;

            if chunks.is_empty() && chunk.kind() != ChunkType::IHDR {
                return Err(Error::MissingIhdr(chunk.kind()));
            }

            chunks.push(chunk);
        }

        let last = chunks.last().ok_or(Error::NoChunks)?;
        if last.kind() != ChunkType::IEND {
            return Err(Error::MissingIend(last.kind()));
        }

        Ok(Self { chunks })
    }

    /// Get the chunks in file order.
    #[inline]
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Iterate over chunks of one type.
    pub fn chunks_of(&self, kind: ChunkType) -> impl Iterator<Item = &Chunk> + '_ {
        self.chunks.iter().filter(move |c| c.kind() == kind)
    }

    /// Decode every `tEXt` chunk, in file order.
    pub fn text_chunks(&self) -> impl Iterator<Item = Result<TextChunk>> + '_ {
        self.chunks_of(ChunkType::TEXT)
            .map(|c| TextChunk::decode(c.data()))
    }

    /// Return a new PNG with `chunk` placed just before the trailing `IEND`.
    ///
    /// Without an `IEND`, the chunk is appended.
    pub fn insert_before_iend(mut self, chunk: Chunk) -> Self {
        let at = self
            .chunks
            .iter()
            .rposition(|c| c.kind() == ChunkType::IEND)
            .unwrap_or(self.chunks.len());
        self.chunks.insert(at, chunk);
        self
    }

    /// Return a new PNG without the `tEXt` chunks using `keyword`.
    ///
    /// `tEXt` chunks that fail to decode are kept untouched.
    pub fn without_text(mut self, keyword: &str) -> Self {
        self.chunks.retain(|c| {
            c.kind() != ChunkType::TEXT
                || !matches!(TextChunk::decode(c.data()), Ok(t) if t.keyword() == keyword)
        });
        self
    }

    /// Total size of the serialized file.
    pub fn encoded_len(&self) -> usize {
        SIGNATURE.len() + self.chunks.iter().map(Chunk::encoded_len).sum::<usize>()
    }

    /// Serialize back to PNG bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(self.encoded_len());
        output.extend_from_slice(SIGNATURE);

        for chunk in &self.chunks {
            if chunk.len() > MAX_CHUNK_LEN {
                return Err(Error::ChunkTooLarge(chunk.len()));
            }

            let header = ChunkHeader::new(chunk.len() as u32, chunk.kind());
            output.extend_from_slice(header.as_bytes());
            output.extend_from_slice(chunk.data());
            output.extend_from_slice(&chunk.crc().to_be_bytes());
        }

        Ok(output)
    }
}

/// Read one chunk at the reader's position.
fn read_chunk(reader: &mut BinaryReader<'_>) -> chara_common::Result<Chunk> {
    let header: ChunkHeader = reader.read_struct()?;
    let length = header.length.get() as usize;
    let data = reader.read_bytes(length)?.to_vec();
    let crc = reader.read_u32()?;

    Ok(Chunk::with_crc(ChunkType(header.kind), data, crc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ihdr() -> Chunk {
        // 1x1, 8-bit RGBA
        Chunk::new(
            ChunkType::IHDR,
            vec![0, 0, 0, 1, 0, 0, 0, 1, 8, 6, 0, 0, 0],
        )
    }

    fn minimal_png() -> Vec<u8> {
        Png::from_chunks(vec![
            ihdr(),
            Chunk::new(ChunkType::IDAT, vec![0x78, 0x9C, 0x63, 0x00, 0x01]),
            Chunk::new(ChunkType::IEND, Vec::new()),
        ])
        .to_bytes()
        .unwrap()
    }

    #[test]
    fn test_parse_minimal() {
        let png = Png::parse(&minimal_png()).unwrap();
        let kinds: Vec<_> = png.chunks().iter().map(Chunk::kind).collect();
        assert_eq!(kinds, [ChunkType::IHDR, ChunkType::IDAT, ChunkType::IEND]);
        assert!(png.chunks().iter().all(Chunk::verify_crc));
    }

    #[test]
    fn test_round_trip_is_byte_exact() {
        let bytes = minimal_png();
        let png = Png::parse(&bytes).unwrap();
        assert_eq!(png.encoded_len(), bytes.len());
        assert_eq!(png.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let bytes = minimal_png();
        assert_eq!(Png::parse(&bytes).unwrap(), Png::parse(&bytes).unwrap());
    }

    #[test]
    fn test_bad_crc_is_preserved() {
        let mut bytes = minimal_png();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;

        let png = Png::parse(&bytes).unwrap();
        assert!(!png.chunks()[2].verify_crc());
        assert_eq!(png.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_invalid_signature() {
        assert!(matches!(Png::parse(&[0u8; 8]), Err(Error::InvalidSignature { .. })));
        assert!(matches!(Png::parse(b"\x89PN"), Err(Error::InvalidSignature { .. })));
        assert!(matches!(Png::parse(&[]), Err(Error::InvalidSignature { .. })));

        let mut bytes = minimal_png();
        bytes[1] = b'p';
        assert!(matches!(Png::parse(&bytes), Err(Error::InvalidSignature { .. })));
    }

    #[test]
    fn test_signature_only() {
        assert!(matches!(Png::parse(SIGNATURE), Err(Error::NoChunks)));
    }

    #[test]
    fn test_missing_ihdr() {
        let bytes = Png::from_chunks(vec![
            Chunk::new(ChunkType::TEXT, b"a\0b".to_vec()),
            Chunk::new(ChunkType::IEND, Vec::new()),
        ])
        .to_bytes()
        .unwrap();

        match Png::parse(&bytes) {
            Err(Error::MissingIhdr(kind)) => assert_eq!(kind, ChunkType::TEXT),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_iend() {
        let bytes = Png::from_chunks(vec![ihdr()]).to_bytes().unwrap();
        match Png::parse(&bytes) {
            Err(Error::MissingIend(kind)) => assert_eq!(kind, ChunkType::IHDR),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_truncated_chunk() {
        let bytes = minimal_png();
        let cut = &bytes[..bytes.len() - 2];
        match Png::parse(cut) {
            Err(Error::TruncatedChunk { offset, .. }) => assert_eq!(offset, bytes.len() - 12),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_insert_before_iend() {
        let png = Png::parse(&minimal_png()).unwrap();
        let text = TextChunk::new("Comment", "hi").unwrap().to_chunk();
        let png = png.insert_before_iend(text.clone());

        assert_eq!(png.chunks().len(), 4);
        assert_eq!(png.chunks()[2], text);
        assert_eq!(png.chunks()[3].kind(), ChunkType::IEND);

        let reparsed = Png::parse(&png.to_bytes().unwrap()).unwrap();
        assert_eq!(reparsed, png);
    }

    #[test]
    fn test_without_text() {
        let png = Png::parse(&minimal_png())
            .unwrap()
            .insert_before_iend(TextChunk::new("chara", "old").unwrap().to_chunk())
            .insert_before_iend(TextChunk::new("Comment", "keep").unwrap().to_chunk());

        let png = png.without_text("chara");
        let keywords: Vec<_> = png
            .text_chunks()
            .map(|t| t.unwrap().keyword().to_string())
            .collect();
        assert_eq!(keywords, ["Comment"]);
    }

    #[test]
    fn test_text_chunks_reports_embedded_nul() {
        let png = Png::parse(&minimal_png())
            .unwrap()
            .insert_before_iend(Chunk::new(ChunkType::TEXT, b"k\0a\0b".to_vec()));

        let results: Vec<_> = png.text_chunks().collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(Error::EmbeddedNul(3))));
    }
}
