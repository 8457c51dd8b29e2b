//! Nanban storage crate - key-value persistence and the phrasebook.
//!
//! Stores are string-keyed and string-valued. The phrasebook keeps its whole
//! phrase list as one JSON array under a fixed key.

pub mod error;
pub mod phrasebook;
pub mod store;

pub use error::StorageError;
pub use phrasebook::{word_gloss, Phrase, PhraseCategory, Phrasebook, STORAGE_KEY};
pub use store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
