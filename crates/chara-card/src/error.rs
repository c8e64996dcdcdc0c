//! Error types for character card decoding and encoding.

use thiserror::Error;

/// Errors that can occur when working with character cards.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from the storage layer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed PNG structure.
    #[error("{0}")]
    Png(#[from] chara_png::Error),

    /// The PNG has no `tEXt` chunks at all.
    #[error("no text chunks")]
    NoTextChunks,

    /// The PNG has `tEXt` chunks, but none keyed `chara`.
    #[error("no chara field")]
    NoCharaField,

    /// The `chara` text is not valid base64.
    #[error("bad base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The card payload is not valid JSON or does not fit the card schema.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    /// The card declares a spec other than `chara_card_v2`.
    #[error("unsupported spec: {0:?}")]
    UnsupportedSpec(String),

    /// A repository document failed validation.
    #[error("invalid repository data: {0}")]
    InvalidRepository(String),
}

/// Broad classes of [`Error`], for deciding how to report a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Storage failed.
    Io,
    /// The input is not a well-formed PNG.
    Format,
    /// A well-formed PNG without card metadata; treat it as a plain image.
    NotFound,
    /// Card metadata is present but corrupt.
    Decode,
    /// Card metadata is well-formed but not a supported version.
    Validation,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::Png(_) => ErrorKind::Format,
            Error::NoTextChunks | Error::NoCharaField => ErrorKind::NotFound,
            Error::Base64(_) | Error::Json(_) => ErrorKind::Decode,
            Error::UnsupportedSpec(_) | Error::InvalidRepository(_) => ErrorKind::Validation,
        }
    }

    /// Check if the image simply carries no card.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Result type for character card operations.
pub type Result<T> = std::result::Result<T, Error>;
