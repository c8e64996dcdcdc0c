//! Application character records.
//!
//! The in-app character shape with camelCase field names, as stored locally
//! and sent to the chat backend.

use serde::{Deserialize, Deserializer, Serialize};

/// Presence shown next to a character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Online,
    Offline,
}

/// A character as the application stores it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterRecord {
    /// Backend ids arrive as numbers; they are kept as their decimal string.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub data: CharacterData,
}

/// The editable fields of a [`CharacterRecord`].
///
/// Every field may be omitted in JSON input, so partially filled form data
/// deserializes with empty defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CharacterData {
    pub name: String,
    /// Local file or remote URL of the avatar image.
    pub avatar: String,
    pub description: String,
    pub personality: String,
    pub scenario: String,
    pub first_message: String,
    pub system_prompt: String,
    pub creator_notes: String,
    pub tags: Vec<String>,
    pub status: Status,
    pub mood: String,

    // Card fields carried through under their wire names.
    #[serde(rename = "mes_example", skip_serializing_if = "String::is_empty")]
    pub mes_example: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub creator: String,
    #[serde(rename = "character_version", skip_serializing_if = "String::is_empty")]
    pub character_version: String,
}

impl CharacterRecord {
    /// Create a record with the given id and data.
    pub fn new(id: impl Into<String>, data: CharacterData) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Parse a record from JSON.
    pub fn from_json(json: &[u8]) -> crate::Result<Self> {
        Ok(serde_json::from_slice(json)?)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
        Null(()),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(id) => id,
        Id::Number(id) => id.to_string(),
        Id::Null(()) => String::new(),
    })
}
