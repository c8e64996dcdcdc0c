//! V2 character cards embedded in PNG avatars.
//!
//! A character card is an ordinary PNG whose `tEXt` chunk keyed `chara`
//! holds the base64-encoded card JSON. The image stays viewable; the card
//! travels with it.
//!
//! # Card Format
//!
//! ```json
//! {
//!   "spec": "chara_card_v2",
//!   "data": {
//!     "name": "Nova", "description": "", "personality": "", "scenario": "",
//!     "first_mes": "Hi!", "system_prompt": "", "creator_notes": "",
//!     "tags": [], "creator": "app-default", "character_version": "1.0.0",
//!     "alternate_greetings": [], "post_history_instructions": "", "extensions": {}
//!   }
//! }
//! ```
//!
//! # Example
//!
//! ```no_run
//! use chara_card::{import_image, CharacterRecord, FsStorage, ImportOutcome};
//!
//! let storage = FsStorage::new();
//!
//! match import_image(&storage, "downloads/nova.png")? {
//!     ImportOutcome::Card(card) => {
//!         let record = CharacterRecord::from_card(&card);
//!         println!("Imported {}", record.data.name);
//!     }
//!     ImportOutcome::PlainImage => println!("No card, using as avatar"),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod card;
mod codec;
mod error;
mod mapping;
mod record;
mod repository;
mod storage;

pub use card::{CardData, CharacterCard, SPEC_V2};
pub use codec::{
    encode_card, export_file_name, import_bytes, import_image, write_card, ImportOutcome,
    CHARA_KEYWORD,
};
pub use error::{Error, ErrorKind, Result};
pub use mapping::{
    EncodeOptions, CARD_MOOD, DEFAULT_CHARACTER_VERSION, DEFAULT_CREATOR, REPOSITORY_MOOD,
};
pub use record::{CharacterData, CharacterRecord, Status};
pub use repository::{RepositoryCharacter, RepositoryDocument, RepositoryMetadata};
pub use storage::{CardStorage, FsStorage};
