//! Field mapping between wire cards and application records.
//!
//! Pure renaming and defaulting; nothing here can fail.

use chrono::DateTime;
use serde_json::Map;

use crate::record::{CharacterData, CharacterRecord, Status};
use crate::repository::RepositoryCharacter;
use crate::{CardData, CharacterCard};

/// `creator` written into exported cards by default.
pub const DEFAULT_CREATOR: &str = "app-default";

/// `character_version` written into exported cards by default.
pub const DEFAULT_CHARACTER_VERSION: &str = "1.0.0";

/// Mood given to characters imported from a PNG card.
pub const CARD_MOOD: &str = "Cheerful";

/// Mood given to characters loaded from a repository.
pub const REPOSITORY_MOOD: &str = "neutral";

/// Values stamped onto cards built from application records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    pub creator: String,
    pub character_version: String,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            creator: DEFAULT_CREATOR.to_string(),
            character_version: DEFAULT_CHARACTER_VERSION.to_string(),
        }
    }
}

impl CharacterCard {
    /// Build the export card for an application record.
    ///
    /// Only the fields the application edits are carried over; greetings,
    /// post-history instructions and extensions are written empty.
    pub fn from_record(record: &CharacterRecord, options: &EncodeOptions) -> Self {
        let data = &record.data;

        Self::new(CardData {
            name: data.name.clone(),
            description: data.description.clone(),
            personality: data.personality.clone(),
            scenario: data.scenario.clone(),
            first_mes: data.first_message.clone(),
            system_prompt: data.system_prompt.clone(),
            creator_notes: data.creator_notes.clone(),
            tags: data.tags.clone(),
            creator: options.creator.clone(),
            character_version: options.character_version.clone(),
            alternate_greetings: Vec::new(),
            post_history_instructions: String::new(),
            extensions: Map::new(),
            ..CardData::default()
        })
    }
}

impl CharacterRecord {
    /// Build an application record from a decoded card, with a fresh id.
    pub fn from_card(card: &CharacterCard) -> Self {
        Self::from_card_with_id(card, uuid::Uuid::new_v4().to_string())
    }

    /// Build an application record from a decoded card.
    ///
    /// The avatar is the image the card was read from, falling back to the
    /// card's own `avatar` URL.
    pub fn from_card_with_id(card: &CharacterCard, id: impl Into<String>) -> Self {
        let wire = &card.data;

        let avatar = card
            .avatar_uri
            .clone()
            .unwrap_or_else(|| wire.avatar.clone());

        Self::new(
            id,
            CharacterData {
                name: wire.name.clone(),
                avatar,
                description: wire.description.clone(),
                personality: wire.personality.clone(),
                scenario: wire.scenario.clone(),
                first_message: wire.first_mes.clone(),
                system_prompt: wire.system_prompt.clone(),
                creator_notes: wire.creator_notes.clone(),
                tags: wire.tags.clone(),
                status: Status::Online,
                mood: CARD_MOOD.to_string(),
                mes_example: wire.mes_example.clone(),
                creator: wire.creator.clone(),
                character_version: wire.character_version.clone(),
            },
        )
    }

    /// Build an application record from a repository entry.
    ///
    /// Missing creator notes are replaced by the entry's creation and update
    /// dates.
    pub fn from_repository(entry: &RepositoryCharacter) -> Self {
        let wire = &entry.data;

        let creator_notes = if wire.creator_notes.is_empty() {
            format!(
                "Created: {}\nUpdated: {}",
                display_date(&entry.created_at),
                display_date(&entry.updated_at)
            )
        } else {
            wire.creator_notes.clone()
        };

        let character_version = if wire.character_version.is_empty() {
            DEFAULT_CHARACTER_VERSION.to_string()
        } else {
            wire.character_version.clone()
        };

        Self::new(
            entry.id.clone(),
            CharacterData {
                name: wire.name.clone(),
                avatar: wire.avatar.clone(),
                description: wire.description.clone(),
                personality: wire.personality.clone(),
                scenario: wire.scenario.clone(),
                first_message: wire.first_mes.clone(),
                system_prompt: wire.system_prompt.clone(),
                creator_notes,
                tags: wire.tags.clone(),
                status: Status::Online,
                mood: REPOSITORY_MOOD.to_string(),
                mes_example: String::new(),
                creator: wire.creator.clone(),
                character_version,
            },
        )
    }
}

/// Render an RFC 3339 timestamp as `M/D/YYYY`, or pass it through unchanged.
fn display_date(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(date) => date.format("%-m/%-d/%Y").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nova() -> CharacterRecord {
        CharacterRecord::new(
            "1",
            CharacterData {
                name: "Nova".to_string(),
                avatar: "file:///avatars/nova.png".to_string(),
                first_message: "Hi!".to_string(),
                system_prompt: "Stay in character.".to_string(),
                creator_notes: "Test".to_string(),
                tags: vec!["sci-fi".to_string(), "pilot".to_string()],
                status: Status::Offline,
                mood: "Calm".to_string(),
                creator: "someone".to_string(),
                ..CharacterData::default()
            },
        )
    }

    #[test]
    fn test_record_to_card() {
        let card = CharacterCard::from_record(&nova(), &EncodeOptions::default());

        assert_eq!(card.spec, crate::SPEC_V2);
        assert_eq!(card.data.name, "Nova");
        assert_eq!(card.data.first_mes, "Hi!");
        assert_eq!(card.data.system_prompt, "Stay in character.");
        assert_eq!(card.data.tags, ["sci-fi", "pilot"]);
        assert_eq!(card.data.creator, DEFAULT_CREATOR);
        assert_eq!(card.data.character_version, DEFAULT_CHARACTER_VERSION);
        assert!(card.data.alternate_greetings.is_empty());
        assert!(card.data.extensions.is_empty());
        // The avatar travels as the image itself, not as a field
        assert_eq!(card.data.avatar, "");
    }

    #[test]
    fn test_encode_options_override() {
        let options = EncodeOptions {
            creator: "studio".to_string(),
            character_version: "2.1.0".to_string(),
        };
        let card = CharacterCard::from_record(&nova(), &options);

        assert_eq!(card.data.creator, "studio");
        assert_eq!(card.data.character_version, "2.1.0");
    }

    #[test]
    fn test_card_to_record() {
        let card = CharacterCard::from_record(&nova(), &EncodeOptions::default())
            .with_avatar_uri("file:///cards/nova_card.png");
        let record = CharacterRecord::from_card_with_id(&card, "42");

        assert_eq!(record.id, "42");
        assert_eq!(record.data.avatar, "file:///cards/nova_card.png");
        assert_eq!(record.data.first_message, "Hi!");
        assert_eq!(record.data.creator_notes, "Test");
        assert_eq!(record.data.status, Status::Online);
        assert_eq!(record.data.mood, CARD_MOOD);
        assert_eq!(record.data.creator, DEFAULT_CREATOR);
    }

    #[test]
    fn test_card_avatar_fallback() {
        let mut card = CharacterCard::new(CardData::default());
        card.data.avatar = "https://example.com/a.png".to_string();

        let record = CharacterRecord::from_card(&card);
        assert_eq!(record.data.avatar, "https://example.com/a.png");
        assert!(!record.id.is_empty());
        assert_ne!(record.id, CharacterRecord::from_card(&card).id);
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("2024-01-15T10:30:00Z"), "1/15/2024");
        assert_eq!(display_date("2023-11-02T00:00:00+02:00"), "11/2/2023");
        assert_eq!(display_date("yesterday"), "yesterday");
    }
}
