//! Nanban Gloss crate - text-to-gloss translation.
//!
//! Maps free text onto an ordered sequence of gloss tokens using an ordered
//! phrase dictionary: exact phrase match, then a first-hit substring scan in
//! dictionary order, then word-by-word lookup with fingerspelling fallback.

pub mod dictionary;
pub mod translator;
pub mod vocabulary;

pub use dictionary::{normalize_phrase, DictionaryEntry, GlossDictionary};
pub use translator::GlossTranslator;
