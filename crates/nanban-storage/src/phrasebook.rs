//! Saved phrases with their gloss, grouped by category.
//!
//! The whole list lives as one JSON array under [`STORAGE_KEY`]. A store
//! without that key is seeded with the default phrases; an unreadable or
//! corrupt value falls back to the defaults in memory without overwriting
//! what is stored.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::StorageError;
use crate::store::KeyValueStore;

/// Key the phrase list is stored under.
pub const STORAGE_KEY: &str = "@SignLanguageNanban:phrases";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhraseCategory {
    Greetings,
    Courtesy,
    Questions,
    Emergency,
    Custom,
}

impl PhraseCategory {
    pub const ALL: [PhraseCategory; 5] = [
        PhraseCategory::Greetings,
        PhraseCategory::Courtesy,
        PhraseCategory::Questions,
        PhraseCategory::Emergency,
        PhraseCategory::Custom,
    ];
}

impl fmt::Display for PhraseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhraseCategory::Greetings => write!(f, "Greetings"),
            PhraseCategory::Courtesy => write!(f, "Courtesy"),
            PhraseCategory::Questions => write!(f, "Questions"),
            PhraseCategory::Emergency => write!(f, "Emergency"),
            PhraseCategory::Custom => write!(f, "Custom"),
        }
    }
}

impl FromStr for PhraseCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PhraseCategory::ALL
            .into_iter()
            .find(|c| c.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown phrase category '{s}'"))
    }
}

/// A saved phrase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phrase {
    pub id: String,
    pub text: String,
    pub gloss: Vec<String>,
    pub category: PhraseCategory,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
}

impl Phrase {
    /// Case-insensitive match on the text or any gloss token.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.text.to_lowercase().contains(&query)
            || self.gloss.iter().any(|t| t.to_lowercase().contains(&query))
    }
}

/// Word-by-word gloss for a phrase typed by the user: upper-cased, with
/// punctuation removed, one token per word. Unlike the translator this
/// never folds words into dictionary signs.
pub fn word_gloss(text: &str) -> Vec<String> {
    text.to_uppercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn default_phrases() -> Vec<Phrase> {
    let now = Utc::now();
    let phrase = |id: &str, text: &str, gloss: &[&str], category, is_favorite| Phrase {
        id: id.to_string(),
        text: text.to_string(),
        gloss: gloss.iter().map(|t| t.to_string()).collect(),
        category,
        is_favorite,
        created_at: now,
    };

    vec![
        phrase(
            "1",
            "Hello, how are you?",
            &["HELLO", "HOW", "YOU"],
            PhraseCategory::Greetings,
            false,
        ),
        phrase(
            "2",
            "Thank you very much",
            &["THANK-YOU", "VERY", "MUCH"],
            PhraseCategory::Courtesy,
            true,
        ),
        phrase(
            "3",
            "What is your name?",
            &["WHAT", "YOUR", "NAME"],
            PhraseCategory::Questions,
            false,
        ),
        phrase(
            "4",
            "I need help",
            &["I", "NEED", "HELP"],
            PhraseCategory::Emergency,
            true,
        ),
    ]
}

/// Phrase list bound to a key-value store.
#[derive(Debug)]
pub struct Phrasebook<S> {
    store: S,
    phrases: Vec<Phrase>,
}

impl<S: KeyValueStore> Phrasebook<S> {
    /// Load the phrase list from `store`, seeding it with the defaults when
    /// nothing is stored yet.
    ///
    /// Never fails: a corrupt or unreadable value is logged and replaced by
    /// the defaults in memory only.
    pub fn load_or_default(store: S) -> Self {
        let phrases = match store.get(STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Phrase>>(&raw) {
                Ok(phrases) => {
                    info!(count = phrases.len(), "Phrasebook loaded");
                    phrases
                }
                Err(e) => {
                    warn!("Stored phrases are corrupt: {}. Using defaults.", e);
                    default_phrases()
                }
            },
            Ok(None) => {
                let defaults = default_phrases();
                match serde_json::to_string(&defaults) {
                    Ok(raw) => {
                        if let Err(e) = store.set(STORAGE_KEY, &raw) {
                            warn!("Failed to seed default phrases: {}", e);
                        }
                    }
                    Err(e) => warn!("Failed to encode default phrases: {}", e),
                }
                info!(count = defaults.len(), "Phrasebook seeded with defaults");
                defaults
            }
            Err(e) => {
                warn!("Failed to read stored phrases: {}. Using defaults.", e);
                default_phrases()
            }
        };

        Self { store, phrases }
    }

    /// All phrases in insertion order.
    pub fn all(&self) -> &[Phrase] {
        &self.phrases
    }

    pub fn get(&self, id: &str) -> Option<&Phrase> {
        self.phrases.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Phrases in `category` (any category when `None`) matching `query`.
    pub fn filter(&self, category: Option<PhraseCategory>, query: &str) -> Vec<&Phrase> {
        self.phrases
            .iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .filter(|p| p.matches(query))
            .collect()
    }

    /// Save a new phrase. Blank text is rejected with `Ok(None)`.
    pub fn add(
        &mut self,
        text: &str,
        gloss: Vec<String>,
        category: PhraseCategory,
    ) -> Result<Option<&Phrase>, StorageError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let phrase = Phrase {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            gloss,
            category,
            is_favorite: false,
            created_at: Utc::now(),
        };
        let mut updated = self.phrases.clone();
        updated.push(phrase);
        self.commit(updated)?;
        info!(category = %category, "Phrase added");
        Ok(self.phrases.last())
    }

    /// Delete the phrase with `id`. Returns `false` if there is none.
    pub fn remove(&mut self, id: &str) -> Result<bool, StorageError> {
        if self.get(id).is_none() {
            return Ok(false);
        }
        let updated = self.phrases.iter().filter(|p| p.id != id).cloned().collect();
        self.commit(updated)?;
        info!(id, "Phrase removed");
        Ok(true)
    }

    /// Flip the favorite flag of the phrase with `id`. Returns `false` if
    /// there is none.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool, StorageError> {
        let Some(index) = self.phrases.iter().position(|p| p.id == id) else {
            return Ok(false);
        };
        let mut updated = self.phrases.clone();
        updated[index].is_favorite = !updated[index].is_favorite;
        self.commit(updated)?;
        Ok(true)
    }

    /// Persist `updated`, then adopt it. On failure the in-memory list is
    /// left as it was.
    fn commit(&mut self, updated: Vec<Phrase>) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&updated)?;
        self.store.set(STORAGE_KEY, &raw)?;
        self.phrases = updated;
        Ok(())
    }
}
