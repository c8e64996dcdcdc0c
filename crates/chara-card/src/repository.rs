//! Remote character repository documents.
//!
//! A repository serves one JSON document listing V2 cards (without PNG
//! wrapping) plus metadata about the repository itself:
//!
//! ```json
//! {
//!   "metadata": { "name": "...", "description": "...", "version": "1", "author": "..." },
//!   "characters": [
//!     { "spec": "chara_card_v2", "data": { ... }, "id": "...",
//!       "created_at": "2024-01-15T10:30:00Z", "updated_at": "..." }
//!   ]
//! }
//! ```
//!
//! Fetching the document is left to the caller.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::CharacterRecord;
use crate::{CardData, Error, Result, SPEC_V2};

/// Card data fields every repository entry must carry as strings.
const REQUIRED_DATA_FIELDS: &[&str] = &[
    "name",
    "description",
    "personality",
    "scenario",
    "first_mes",
    "avatar",
];

/// Optional card data fields that must be strings when present.
const OPTIONAL_STRING_FIELDS: &[&str] = &["system_prompt", "creator_notes", "character_version"];

/// Optional card data fields that must be arrays when present.
const OPTIONAL_ARRAY_FIELDS: &[&str] = &["tags", "alternate_greetings"];

/// Information about the repository itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryMetadata {
    pub name: String,
    pub description: String,
    pub version: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// One card listed by a repository.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RepositoryCharacter {
    pub spec: String,
    pub data: CardData,
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A validated repository document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RepositoryDocument {
    pub metadata: RepositoryMetadata,
    pub characters: Vec<RepositoryCharacter>,
}

impl RepositoryDocument {
    /// Parse and validate a repository document.
    pub fn parse(json: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(json)?;
        validate(&value).map_err(Error::InvalidRepository)?;
        serde_json::from_value(value).map_err(|e| Error::InvalidRepository(e.to_string()))
    }

    /// Map every listed card to an application record.
    pub fn records(&self) -> Vec<CharacterRecord> {
        self.characters
            .iter()
            .map(CharacterRecord::from_repository)
            .collect()
    }
}

/// Check the document shape, returning the first problem found.
fn validate(doc: &Value) -> std::result::Result<(), String> {
    let doc = doc.as_object().ok_or("document is not an object")?;

    let metadata = doc
        .get("metadata")
        .and_then(Value::as_object)
        .ok_or("missing metadata object")?;
    for field in ["name", "description", "version", "author"] {
        if !metadata.get(field).is_some_and(Value::is_string) {
            return Err(format!("metadata.{} must be a string", field));
        }
    }

    let characters = doc
        .get("characters")
        .and_then(Value::as_array)
        .ok_or("missing characters array")?;

    for (index, character) in characters.iter().enumerate() {
        validate_character(character).map_err(|e| format!("characters[{}]: {}", index, e))?;
    }

    Ok(())
}

fn validate_character(character: &Value) -> std::result::Result<(), String> {
    let character = character.as_object().ok_or("not an object")?;

    if character.get("spec").and_then(Value::as_str) != Some(SPEC_V2) {
        return Err(format!("spec must be {:?}", SPEC_V2));
    }

    for field in ["id", "created_at", "updated_at"] {
        if !character.get(field).is_some_and(Value::is_string) {
            return Err(format!("{} must be a string", field));
        }
    }

    let data = character
        .get("data")
        .and_then(Value::as_object)
        .ok_or("missing data object")?;

    for &field in REQUIRED_DATA_FIELDS {
        if !data.get(field).is_some_and(Value::is_string) {
            return Err(format!("data.{} must be a string", field));
        }
    }

    let present = |field: &str| data.get(field).filter(|v| !v.is_null());

    for &field in OPTIONAL_STRING_FIELDS {
        if present(field).is_some_and(|v| !v.is_string()) {
            return Err(format!("data.{} must be a string", field));
        }
    }

    for &field in OPTIONAL_ARRAY_FIELDS {
        if present(field).is_some_and(|v| !v.is_array()) {
            return Err(format!("data.{} must be an array", field));
        }
    }

    Ok(())
}
