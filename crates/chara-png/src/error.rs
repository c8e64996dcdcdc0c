//! Error types for PNG chunk parsing and writing.

use thiserror::Error;

use crate::ChunkType;

/// Errors that can occur when reading or writing PNG chunks.
#[derive(Debug, Error)]
pub enum Error {
    /// The buffer does not start with the PNG signature.
    #[error("invalid header: expected PNG signature, got {actual:02x?}")]
    InvalidSignature { actual: Vec<u8> },

    /// A chunk runs past the end of the buffer.
    #[error("truncated chunk at offset {offset}: {source}")]
    TruncatedChunk {
        offset: usize,
        #[source]
        source: chara_common::Error,
    },

    /// The first chunk is not `IHDR`.
    #[error("missing IHDR: first chunk is {0}")]
    MissingIhdr(ChunkType),

    /// Nothing follows the signature.
    #[error("no chunks after PNG signature")]
    NoChunks,

    /// The last chunk is not `IEND`.
    #[error("missing IEND: last chunk is {0}")]
    MissingIend(ChunkType),

    /// A second NUL byte inside a `tEXt` chunk's text.
    #[error("embedded NUL in tEXt chunk at byte {0}")]
    EmbeddedNul(usize),

    /// A `tEXt` keyword that PNG does not allow.
    #[error("invalid tEXt keyword {0:?}: must be 1-79 Latin-1 characters without NUL")]
    InvalidKeyword(String),

    /// `tEXt` content that cannot be stored as Latin-1.
    #[error("invalid tEXt text: character {0:?} is NUL or outside Latin-1")]
    InvalidText(char),

    /// Chunk data longer than PNG's length field allows.
    #[error("chunk too large: {0} bytes")]
    ChunkTooLarge(usize),
}

/// Result type for PNG chunk operations.
pub type Result<T> = std::result::Result<T, Error>;
