//! Text-to-gloss translation.
//!
//! Conversion never fails. Strategies are tried in priority order:
//! 1. exact phrase match on the normalized text;
//! 2. substring scan in dictionary enumeration order, first contained phrase
//!    wins (a short phrase listed early shadows a longer, more specific one);
//! 3. word-by-word: punctuation stripped, each word mapped through the
//!    dictionary or upper-cased as a fingerspelling token;
//! 4. the upper-cased input as a single token when no word survives.

use crate::dictionary::{normalize_phrase, GlossDictionary};

/// Converts free text into gloss tokens backed by a [`GlossDictionary`].
#[derive(Debug, Clone)]
pub struct GlossTranslator {
    dictionary: GlossDictionary,
}

impl Default for GlossTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl GlossTranslator {
    /// Create a translator seeded with the built-in vocabulary.
    pub fn new() -> Self {
        Self::with_dictionary(GlossDictionary::seeded())
    }

    /// Create a translator with no phrase mappings (pure fingerspelling).
    pub fn empty() -> Self {
        Self::with_dictionary(GlossDictionary::new())
    }

    pub fn with_dictionary(dictionary: GlossDictionary) -> Self {
        Self { dictionary }
    }

    pub fn dictionary(&self) -> &GlossDictionary {
        &self.dictionary
    }

    /// Convert text into an ordered gloss sequence.
    ///
    /// Returns an empty sequence only when the text is blank after trimming;
    /// any other input yields at least one token. Text with no word
    /// characters comes back as a single token: the input trimmed of outer
    /// whitespace and upper-cased.
    pub fn convert(&self, text: &str) -> Vec<String> {
        let normalized = normalize_phrase(text);
        if normalized.is_empty() {
            return Vec::new();
        }

        if let Some(gloss) = self.dictionary.get_normalized(&normalized) {
            tracing::debug!(phrase = %normalized, "Gloss exact match");
            return gloss.to_vec();
        }

        if let Some(entry) = self
            .dictionary
            .iter()
            .find(|entry| normalized.contains(entry.phrase.as_str()))
        {
            tracing::debug!(phrase = %entry.phrase, "Gloss substring match");
            return entry.gloss.clone();
        }

        let stripped = strip_punctuation(&normalized);
        let mut gloss = Vec::new();
        for word in stripped.split_whitespace() {
            match self.dictionary.get_normalized(word) {
                Some(tokens) => gloss.extend_from_slice(tokens),
                None => gloss.push(word.to_uppercase()),
            }
        }

        if gloss.is_empty() {
            tracing::debug!("No word survived punctuation stripping, using raw input");
            return vec![text.trim().to_uppercase()];
        }

        tracing::debug!(tokens = gloss.len(), "Gloss word-by-word fallback");
        gloss
    }

    /// Add or overwrite a phrase mapping.
    ///
    /// Blank phrases and token lists without a non-blank token are ignored.
    pub fn add_mapping(&mut self, phrase: &str, gloss: Vec<String>) {
        self.dictionary.insert(phrase, gloss);
    }

    /// Remove a phrase mapping. Returns `true` if a mapping was removed.
    pub fn remove_mapping(&mut self, phrase: &str) -> bool {
        self.dictionary.remove(phrase).is_some()
    }

    pub fn has_mapping(&self, phrase: &str) -> bool {
        self.dictionary.contains(phrase)
    }

    /// All mapped phrases in enumeration order.
    pub fn list_phrases(&self) -> Vec<String> {
        self.dictionary.phrases()
    }

    /// Gloss mapped to exactly this phrase, without any fallback.
    pub fn lookup(&self, phrase: &str) -> Option<&[String]> {
        self.dictionary.get(phrase)
    }
}

/// Keep word characters (alphanumeric or `_`) and whitespace.
fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect()
}
