//! Common utilities for chara.
//!
//! This crate provides the foundational pieces shared by the chara crates:
//!
//! - [`BinaryReader`] - Zero-copy big-endian reading from byte slices
//! - [`crc`] - PNG CRC-32 (ISO 3309 / ITU-T V.42) checksums

mod error;
mod reader;

pub mod crc;

pub use error::{Error, Result};
pub use reader::BinaryReader;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
