//! chara - V2 character cards in PNG avatars.
//!
//! This crate provides a unified interface to the chara library family.
//!
//! # Crates
//!
//! - [`chara_common`] - Common utilities (big-endian reading, PNG CRC-32)
//! - [`chara_png`] - Lossless PNG chunk reading and writing
//! - [`chara_card`] - Card decoding/encoding and mapping to application records
//!
//! # Example
//!
//! ```no_run
//! use chara::prelude::*;
//!
//! let avatar = std::fs::read("nova.png")?;
//!
//! let record = CharacterRecord::new("1", CharacterData {
//!     name: "Nova".to_string(),
//!     first_message: "Hi!".to_string(),
//!     ..CharacterData::default()
//! });
//!
//! let card_png = encode_card(&record, &avatar, &EncodeOptions::default())?;
//! let card = CharacterCard::decode(&card_png)?;
//! assert_eq!(card.data.first_mes, "Hi!");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use chara_card as card;
pub use chara_common as common;
pub use chara_png as png;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use chara_card::{
        encode_card, export_file_name, import_bytes, import_image, write_card, CardData,
        CardStorage, CharacterCard, CharacterData, CharacterRecord, EncodeOptions, ErrorKind,
        FsStorage, ImportOutcome, RepositoryDocument, Status,
    };
    pub use chara_common::{crc, BinaryReader};
    pub use chara_png::{Chunk, ChunkType, Png, TextChunk};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
