//! V2 character card wire schema.
//!
//! This is the snake_case JSON shape stored base64-encoded in a PNG `tEXt`
//! chunk and served by card repositories. Every field is optional on input;
//! missing and `null` values both read as empty strings, lists or maps.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// The only supported value of the `spec` field.
pub const SPEC_V2: &str = "chara_card_v2";

/// A parsed V2 character card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterCard {
    /// Card format tag, always [`SPEC_V2`].
    pub spec: String,
    /// Character definition.
    pub data: CardData,
    /// Image the card was read from, if it came from storage.
    #[serde(skip)]
    pub avatar_uri: Option<String>,
}

/// The `data` object of a V2 card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardData {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub personality: String,
    #[serde(deserialize_with = "null_as_default")]
    pub scenario: String,
    #[serde(deserialize_with = "null_as_default")]
    pub first_mes: String,
    #[serde(deserialize_with = "null_as_default")]
    pub system_prompt: String,
    #[serde(deserialize_with = "null_as_default")]
    pub creator_notes: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub creator: String,
    #[serde(deserialize_with = "null_as_default")]
    pub character_version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub alternate_greetings: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub post_history_instructions: String,
    #[serde(deserialize_with = "null_as_default")]
    pub extensions: Map<String, Value>,

    /// Image URL, used by repository cards.
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub avatar: String,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Map::is_empty")]
    pub character_book: Map<String, Value>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub mes_example: String,
    /// Linked lorebook name.
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub world: String,
    /// V1 name of `first_mes`.
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub greeting: String,
}

impl CharacterCard {
    /// Create a V2 card from its data.
    pub fn new(data: CardData) -> Self {
        Self {
            spec: SPEC_V2.to_string(),
            data,
            avatar_uri: None,
        }
    }

    /// Parse and validate card JSON.
    ///
    /// The `spec` tag is checked before the `data` object is mapped, so an
    /// unsupported card is reported as such even if its data is malformed.
    pub fn from_json(json: &[u8]) -> Result<Self> {
        let mut value: Value = serde_json::from_slice(json)?;

        match value.get("spec") {
            Some(Value::String(spec)) if spec == SPEC_V2 => {}
            Some(Value::String(spec)) => return Err(Error::UnsupportedSpec(spec.clone())),
            Some(other) => return Err(Error::UnsupportedSpec(other.to_string())),
            None => return Err(Error::UnsupportedSpec(String::new())),
        }

        let data = value.get_mut("data").map(Value::take).unwrap_or(Value::Null);
        let mut data: CardData = serde_json::from_value(data)?;

        if data.first_mes.is_empty() && !data.greeting.is_empty() {
            data.first_mes = data.greeting.clone();
        }

        Ok(Self::new(data))
    }

    /// Serialize to compact card JSON.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Attach the URI of the image this card came from.
    pub fn with_avatar_uri(mut self, uri: impl Into<String>) -> Self {
        self.avatar_uri = Some(uri.into());
        self
    }
}

/// Read `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let card = CharacterCard::from_json(br#"{"spec":"chara_card_v2","data":{"name":"Nova"}}"#)
            .unwrap();

        assert_eq!(card.data.name, "Nova");
        assert_eq!(card.data.description, "");
        assert!(card.data.tags.is_empty());
        assert!(card.data.extensions.is_empty());
        assert!(card.avatar_uri.is_none());
    }

    #[test]
    fn test_null_fields_default_to_empty() {
        let json = br#"{"spec":"chara_card_v2","data":{
            "name":"Nova","tags":null,"creator_notes":null,"extensions":null,"character_book":null
        }}"#;
        let card = CharacterCard::from_json(json).unwrap();

        assert!(card.data.tags.is_empty());
        assert_eq!(card.data.creator_notes, "");
        assert!(card.data.character_book.is_empty());
    }

    #[test]
    fn test_greeting_fallback() {
        let json = br#"{"spec":"chara_card_v2","data":{"name":"Old","greeting":"Hello there"}}"#;
        let card = CharacterCard::from_json(json).unwrap();
        assert_eq!(card.data.first_mes, "Hello there");

        let json = br#"{"spec":"chara_card_v2","data":{"first_mes":"Hi","greeting":"Hello"}}"#;
        let card = CharacterCard::from_json(json).unwrap();
        assert_eq!(card.data.first_mes, "Hi");
    }

    #[test]
    fn test_extensions_are_kept() {
        let json = br#"{"spec":"chara_card_v2","data":{"extensions":{"depth_prompt":{"depth":4}}}}"#;
        let card = CharacterCard::from_json(json).unwrap();
        assert_eq!(card.data.extensions["depth_prompt"]["depth"], 4);
    }

    #[test]
    fn test_unsupported_spec() {
        let cases: [&[u8]; 3] = [
            br#"{"spec":"chara_card_v3","data":{}}"#,
            br#"{"spec":2,"data":{}}"#,
            br#"{"data":{"name":"V1"}}"#,
        ];
        for json in cases {
            let err = CharacterCard::from_json(json).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "{}", err);
        }
    }

    #[test]
    fn test_invalid_json() {
        let err = CharacterCard::from_json(b"{not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));

        // Right spec but no data object
        let err = CharacterCard::from_json(br#"{"spec":"chara_card_v2"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);

        let err =
            CharacterCard::from_json(br#"{"spec":"chara_card_v2","data":{"tags":"a,b"}}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_to_json_omits_empty_extras() {
        let card = CharacterCard::new(CardData {
            name: "Nova".to_string(),
            ..CardData::default()
        });
        let value: Value = serde_json::from_slice(&card.to_json().unwrap()).unwrap();

        assert_eq!(value["spec"], SPEC_V2);
        assert_eq!(value["data"]["extensions"], serde_json::json!({}));
        assert!(value["data"].get("avatar").is_none());
        assert!(value["data"].get("greeting").is_none());
        assert!(value.get("avatar_uri").is_none());
    }
}
