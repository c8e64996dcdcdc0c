//! Reading and writing character cards inside PNG files.
//!
//! The card JSON is base64-encoded and stored in a `tEXt` chunk keyed
//! `chara`. Writing splices that chunk into an existing PNG just before
//! `IEND`, leaving every other chunk byte-for-byte intact.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use chara_png::{Png, TextChunk};

use crate::mapping::EncodeOptions;
use crate::record::CharacterRecord;
use crate::storage::CardStorage;
use crate::{CharacterCard, Error, Result};

/// `tEXt` keyword the card is stored under.
pub const CHARA_KEYWORD: &str = "chara";

/// Standard base64 that accepts input with or without padding, and with
/// non-zero trailing bits in the last symbol.
const CARD_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// What an imported image turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    /// The image carries a character card.
    Card(CharacterCard),
    /// A well-formed PNG with no card; use it as a plain avatar.
    PlainImage,
}

impl CharacterCard {
    /// Decode the card embedded in PNG bytes.
    ///
    /// Fails with [`Error::NoTextChunks`] or [`Error::NoCharaField`] when the
    /// image is fine but carries no card.
    pub fn decode(png: &[u8]) -> Result<Self> {
        let png = Png::parse(png)?;

        let texts = png.text_chunks().collect::<chara_png::Result<Vec<_>>>()?;
        if texts.is_empty() {
            return Err(Error::NoTextChunks);
        }

        let chara = texts
            .iter()
            .find(|t| t.keyword() == CHARA_KEYWORD)
            .ok_or(Error::NoCharaField)?;

        // Whitespace is ignored, as browsers' atob() does
        let encoded: Vec<u8> = chara
            .text()
            .bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        let json = CARD_BASE64.decode(encoded)?;

        Self::from_json(&json)
    }

    /// Read and decode the card stored at `uri`, tagging it with that URI.
    pub fn read<S: CardStorage + ?Sized>(storage: &S, uri: &str) -> Result<Self> {
        let bytes = storage.read(uri)?;
        Ok(Self::decode(&bytes)?.with_avatar_uri(uri))
    }

    /// Embed this card into a base PNG, returning the new file.
    ///
    /// Any `chara` text already present is replaced. A base image with an
    /// undecodable `tEXt` chunk is rejected, since the result could not be
    /// decoded either.
    pub fn embed(&self, base_png: &[u8]) -> Result<Vec<u8>> {
        let png = Png::parse(base_png)?;
        png.text_chunks().collect::<chara_png::Result<Vec<_>>>()?;

        let encoded = CARD_BASE64.encode(self.to_json()?);
        let chunk = TextChunk::new(CHARA_KEYWORD, encoded)?.to_chunk();

        let png = png.without_text(CHARA_KEYWORD).insert_before_iend(chunk);
        Ok(png.to_bytes()?)
    }
}

/// Build a card from an application record and embed it into a base PNG.
pub fn encode_card(
    record: &CharacterRecord,
    base_png: &[u8],
    options: &EncodeOptions,
) -> Result<Vec<u8>> {
    CharacterCard::from_record(record, options).embed(base_png)
}

/// Read the avatar at `avatar_uri`, embed `record` and write the card to `card_uri`.
pub fn write_card<S: CardStorage + ?Sized>(
    storage: &S,
    record: &CharacterRecord,
    avatar_uri: &str,
    card_uri: &str,
    options: &EncodeOptions,
) -> Result<()> {
    let base = storage.read(avatar_uri)?;
    let card = encode_card(record, &base, options)?;
    storage.write(card_uri, &card)?;
    Ok(())
}

/// Classify PNG bytes as a card or a plain image.
///
/// Only a missing card becomes [`ImportOutcome::PlainImage`]; malformed
/// PNGs and corrupt cards are still errors.
pub fn import_bytes(png: &[u8]) -> Result<ImportOutcome> {
    match CharacterCard::decode(png) {
        Ok(card) => Ok(ImportOutcome::Card(card)),
        Err(e) if e.is_not_found() => Ok(ImportOutcome::PlainImage),
        Err(e) => Err(e),
    }
}

/// Classify the image stored at `uri` as a card or a plain image.
pub fn import_image<S: CardStorage + ?Sized>(storage: &S, uri: &str) -> Result<ImportOutcome> {
    let bytes = storage.read(uri)?;
    Ok(match import_bytes(&bytes)? {
        ImportOutcome::Card(card) => ImportOutcome::Card(card.with_avatar_uri(uri)),
        ImportOutcome::PlainImage => ImportOutcome::PlainImage,
    })
}

/// File name for an exported card: non-alphanumerics become `_`.
pub fn export_file_name(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_card.png", stem)
}
