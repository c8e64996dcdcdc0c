//! `tEXt` chunk entries.
//!
//! A `tEXt` chunk holds a Latin-1 keyword, a NUL separator and Latin-1 text.
//! The text itself may not contain NUL.

use memchr::memchr;

use crate::{Chunk, ChunkType, Error, Result};

/// Longest keyword PNG allows.
const MAX_KEYWORD_LEN: usize = 79;

/// A decoded `tEXt` keyword/text pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    keyword: String,
    text: String,
}

impl TextChunk {
    /// Create a text entry, checking that both parts fit in a `tEXt` chunk.
    pub fn new(keyword: impl Into<String>, text: impl Into<String>) -> Result<Self> {
        let keyword = keyword.into();
        let text = text.into();

        let keyword_len = keyword.chars().count();
        if keyword_len == 0
            || keyword_len > MAX_KEYWORD_LEN
            || keyword.chars().any(|c| c == '\0' || !is_latin1(c))
        {
            return Err(Error::InvalidKeyword(keyword));
        }

        if let Some(c) = text.chars().find(|&c| c == '\0' || !is_latin1(c)) {
            return Err(Error::InvalidText(c));
        }

        Ok(Self { keyword, text })
    }

    /// Decode the data of a `tEXt` chunk.
    ///
    /// Data without any NUL is taken entirely as the keyword with empty text.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (keyword, text) = match memchr(0, data) {
            Some(sep) => (&data[..sep], &data[sep + 1..]),
            None => (data, &data[data.len()..]),
        };

        if let Some(nul) = memchr(0, text) {
            return Err(Error::EmbeddedNul(keyword.len() + 1 + nul));
        }

        Ok(Self {
            keyword: latin1_to_string(keyword),
            text: latin1_to_string(text),
        })
    }

    /// Get the keyword.
    #[inline]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Get the text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Encode as chunk data: keyword, NUL, text.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.keyword.len() + 1 + self.text.len());
        out.extend(self.keyword.chars().map(|c| c as u8));
        out.push(0);
        out.extend(self.text.chars().map(|c| c as u8));
        out
    }

    /// Build a `tEXt` chunk with a fresh CRC.
    pub fn to_chunk(&self) -> Chunk {
        Chunk::new(ChunkType::TEXT, self.to_bytes())
    }
}

#[inline]
fn is_latin1(c: char) -> bool {
    (c as u32) <= 0xFF
}

fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_keyword_and_text() {
        let text = TextChunk::decode(b"chara\0eyJhIjoxfQ==").unwrap();
        assert_eq!(text.keyword(), "chara");
        assert_eq!(text.text(), "eyJhIjoxfQ==");
    }

    #[test]
    fn test_decode_without_separator() {
        let text = TextChunk::decode(b"Title").unwrap();
        assert_eq!(text.keyword(), "Title");
        assert_eq!(text.text(), "");
    }

    #[test]
    fn test_second_nul_is_rejected() {
        match TextChunk::decode(b"chara\0abc\0def") {
            Err(Error::EmbeddedNul(pos)) => assert_eq!(pos, 9),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_latin1_text() {
        let text = TextChunk::decode(b"Author\0Jos\xe9").unwrap();
        assert_eq!(text.text(), "José");
        assert_eq!(text.to_bytes(), b"Author\0Jos\xe9");
    }

    #[test]
    fn test_new_validates_keyword() {
        assert!(matches!(TextChunk::new("", "x"), Err(Error::InvalidKeyword(_))));
        assert!(matches!(
            TextChunk::new("k".repeat(80), "x"),
            Err(Error::InvalidKeyword(_))
        ));
        assert!(matches!(TextChunk::new("a\0b", "x"), Err(Error::InvalidKeyword(_))));
        assert!(TextChunk::new("k".repeat(79), "x").is_ok());
    }

    #[test]
    fn test_new_validates_text() {
        assert!(matches!(TextChunk::new("Comment", "snow ☃"), Err(Error::InvalidText('☃'))));
        assert!(matches!(TextChunk::new("Comment", "a\0b"), Err(Error::InvalidText('\0'))));
    }

    #[test]
    fn test_to_chunk() {
        let chunk = TextChunk::new("chara", "e30=").unwrap().to_chunk();
        assert_eq!(chunk.kind(), ChunkType::TEXT);
        assert_eq!(chunk.data(), b"chara\0e30=");
        assert!(chunk.verify_crc());
        assert_eq!(TextChunk::decode(chunk.data()).unwrap().text(), "e30=");
    }
}
