//! Ordered phrase dictionary backing the translator.
//!
//! Enumeration order is part of the API: it is insertion order, an overwrite
//! keeps the phrase at its original position, and a removal keeps the
//! relative order of the remaining phrases.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::vocabulary::SEED_VOCABULARY;

/// Normalize a phrase into its dictionary key form (lowercase, trimmed).
pub fn normalize_phrase(text: &str) -> String {
    text.to_lowercase().trim().to_string()
}

/// A phrase and the gloss tokens it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// Normalized phrase key.
    pub phrase: String,
    /// Ordered, non-empty gloss tokens.
    pub gloss: Vec<String>,
}

/// Phrase -> gloss mapping with stable enumeration order.
#[derive(Debug, Clone, Default)]
pub struct GlossDictionary {
    entries: Vec<DictionaryEntry>,
    index: HashMap<String, usize>,
}

impl GlossDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dictionary holding the built-in vocabulary.
    pub fn seeded() -> Self {
        let mut dictionary = Self::new();
        for (phrase, gloss) in SEED_VOCABULARY {
            dictionary.insert(phrase, gloss.iter().map(|t| t.to_string()).collect());
        }
        dictionary
    }

    /// Insert or overwrite a mapping, returning the previous gloss if any.
    ///
    /// The key is normalized first. Blank keys and glosses without a single
    /// non-blank token are rejected (`None`, dictionary unchanged), since a
    /// blank key would match every input in the substring scan.
    pub fn insert(&mut self, phrase: &str, gloss: Vec<String>) -> Option<Vec<String>> {
        let key = normalize_phrase(phrase);
        let gloss: Vec<String> = gloss
            .into_iter()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .collect();

        if key.is_empty() || gloss.is_empty() {
            tracing::debug!(phrase = %phrase, "Ignoring blank dictionary mapping");
            return None;
        }

        match self.index.get(&key) {
            Some(&position) => {
                let previous = std::mem::replace(&mut self.entries[position].gloss, gloss);
                Some(previous)
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push(DictionaryEntry { phrase: key, gloss });
                None
            }
        }
    }

    /// Remove a mapping, returning the removed entry.
    pub fn remove(&mut self, phrase: &str) -> Option<DictionaryEntry> {
        let key = normalize_phrase(phrase);
        let position = self.index.remove(&key)?;
        let removed = self.entries.remove(position);
        for entry in &self.entries[position..] {
            if let Some(slot) = self.index.get_mut(&entry.phrase) {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    /// Look up the gloss for a phrase (normalized before lookup).
    pub fn get(&self, phrase: &str) -> Option<&[String]> {
        self.get_normalized(&normalize_phrase(phrase))
    }

    /// Look up an already-normalized key.
    pub(crate) fn get_normalized(&self, key: &str) -> Option<&[String]> {
        self.index
            .get(key)
            .map(|&position| self.entries[position].gloss.as_slice())
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.index.contains_key(&normalize_phrase(phrase))
    }

    /// Entries in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = &DictionaryEntry> {
        self.entries.iter()
    }

    /// Phrase keys in enumeration order.
    pub fn phrases(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.phrase.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gloss(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_normalize_phrase() {
        assert_eq!(normalize_phrase("  Thank You  "), "thank you");
        assert_eq!(normalize_phrase("\tHELLO\n"), "hello");
        assert_eq!(normalize_phrase("   "), "");
    }

    #[test]
    fn test_seeded_vocabulary() {
        let dictionary = GlossDictionary::seeded();
        assert_eq!(dictionary.len(), SEED_VOCABULARY.len());
        assert_eq!(dictionary.phrases()[0], "hello");
        assert_eq!(dictionary.phrases()[1], "hi");
        assert_eq!(
            dictionary.get("What is your name").unwrap(),
            gloss(&["WHAT", "YOUR", "NAME"]).as_slice()
        );
    }

    #[test]
    fn test_insert_normalizes_key() {
        let mut dictionary = GlossDictionary::new();
        dictionary.insert("  Good Night ", gloss(&["GOOD", "NIGHT"]));
        assert!(dictionary.contains("good night"));
        assert_eq!(dictionary.phrases(), vec!["good night".to_string()]);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut dictionary = GlossDictionary::new();
        dictionary.insert("a", gloss(&["A"]));
        dictionary.insert("b", gloss(&["B"]));
        dictionary.insert("c", gloss(&["C"]));

        let previous = dictionary.insert("B", gloss(&["BEE"]));
        assert_eq!(previous, Some(gloss(&["B"])));
        assert_eq!(dictionary.phrases(), gloss(&["a", "b", "c"]));
        assert_eq!(dictionary.get("b").unwrap(), gloss(&["BEE"]).as_slice());
    }

    #[test]
    fn test_remove_keeps_relative_order_and_index() {
        let mut dictionary = GlossDictionary::new();
        for key in ["a", "b", "c", "d"] {
            dictionary.insert(key, vec![key.to_uppercase()]);
        }

        let removed = dictionary.remove(" B ").unwrap();
        assert_eq!(removed.phrase, "b");
        assert_eq!(dictionary.phrases(), gloss(&["a", "c", "d"]));
        // Shifted entries are still reachable through the index.
        assert_eq!(dictionary.get("c").unwrap(), gloss(&["C"]).as_slice());
        assert_eq!(dictionary.get("d").unwrap(), gloss(&["D"]).as_slice());
        assert!(dictionary.remove("b").is_none());
    }

    #[test]
    fn test_blank_mappings_are_rejected() {
        let mut dictionary = GlossDictionary::new();
        assert!(dictionary.insert("   ", gloss(&["X"])).is_none());
        assert!(dictionary.insert("word", vec![]).is_none());
        assert!(dictionary.insert("word", gloss(&["  ", ""])).is_none());
        assert!(dictionary.is_empty());
    }

    #[test]
    fn test_blank_tokens_are_dropped() {
        let mut dictionary = GlossDictionary::new();
        dictionary.insert("thanks a lot", gloss(&["THANK-YOU", " ", "MUCH "]));
        assert_eq!(
            dictionary.get("thanks a lot").unwrap(),
            gloss(&["THANK-YOU", "MUCH"]).as_slice()
        );
    }

    #[test]
    fn test_entry_serializes() {
        let entry = DictionaryEntry {
            phrase: "bye".to_string(),
            gloss: gloss(&["GOODBYE"]),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"phrase":"bye","gloss":["GOODBYE"]}"#);
    }
}
