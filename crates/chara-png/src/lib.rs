//! Lossless PNG chunk reader/writer.
//!
//! This crate splits a PNG file into its chunks and reassembles them, so that
//! ancillary metadata can be read or spliced in without touching pixel data.
//! Nothing is decompressed; `IDAT` and every other chunk is carried through
//! as opaque bytes.
//!
//! # File Format
//!
//! A PNG file is an 8-byte signature followed by a sequence of chunks:
//! - 4 bytes: Data length (big-endian, at most 2^31 - 1)
//! - 4 bytes: Chunk type (ASCII, e.g. `IHDR`, `tEXt`, `IEND`)
//! - N bytes: Chunk data
//! - 4 bytes: CRC-32 over type and data
//!
//! The first chunk is always `IHDR` and the last is always `IEND`.
//!
//! # Example
//!
//! ```no_run
//! use chara_png::{Png, TextChunk};
//!
//! let data = std::fs::read("avatar.png")?;
//! let png = Png::parse(&data)?;
//!
//! for text in png.text_chunks() {
//!     let text = text?;
//!     println!("{} = {} bytes", text.keyword(), text.text().len());
//! }
//!
//! let comment = TextChunk::new("Comment", "hello")?;
//! let tagged = png.insert_before_iend(comment.to_chunk());
//! std::fs::write("tagged.png", tagged.to_bytes()?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod chunk;
mod error;
mod png;
mod text;

pub use chunk::{Chunk, ChunkType, MAX_CHUNK_LEN};
pub use error::{Error, Result};
pub use png::{Png, SIGNATURE};
pub use text::TextChunk;
