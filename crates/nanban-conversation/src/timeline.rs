//! Append-only conversation log.
//!
//! Entries are stored oldest-first and never modified after they are
//! appended. Ids come from a counter owned by the log, so they stay unique
//! and increasing across rapid appends and across `clear`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nanban_core::error::Result;
use nanban_core::types::RecognitionResult;

/// Monotonic identifier assigned by a [`ConversationLog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which direction of the conversation produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Speech,
    Sign,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Speech => write!(f, "speech"),
            EntryKind::Sign => write!(f, "sign"),
        }
    }
}

/// An entry as recorded in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub id: EntryId,
    pub kind: EntryKind,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gloss: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<RecognitionResult>>,
    pub timestamp: DateTime<Utc>,
}

/// Content of an entry before the log assigns its id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub kind: EntryKind,
    pub text: String,
    pub gloss: Option<Vec<String>>,
    pub candidates: Option<Vec<RecognitionResult>>,
}

impl EntryDraft {
    /// A recognized (or typed) utterance and its gloss.
    pub fn speech(text: impl Into<String>, gloss: Vec<String>) -> Self {
        Self {
            kind: EntryKind::Speech,
            text: text.into(),
            gloss: Some(gloss),
            candidates: None,
        }
    }

    /// A sign result; the text is the top candidate's label.
    ///
    /// Returns `None` for an empty candidate list.
    pub fn sign(candidates: Vec<RecognitionResult>) -> Option<Self> {
        let text = candidates.first()?.label.clone();
        Some(Self {
            kind: EntryKind::Sign,
            text,
            gloss: None,
            candidates: Some(candidates),
        })
    }
}

/// Ordered record of both conversation directions.
#[derive(Debug, Default)]
pub struct ConversationLog {
    entries: Vec<ConversationEntry>,
    next_id: u64,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, assigning its id and timestamp.
    pub fn append(&mut self, draft: EntryDraft) -> &ConversationEntry {
        self.next_id += 1;
        let entry = ConversationEntry {
            id: EntryId(self.next_id),
            kind: draft.kind,
            text: draft.text,
            gloss: draft.gloss,
            candidates: draft.candidates,
            timestamp: Utc::now(),
        };
        tracing::debug!(id = %entry.id, kind = %entry.kind, "Conversation entry appended");
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// Remove every entry. Ids keep increasing afterwards.
    pub fn clear(&mut self) {
        tracing::info!(removed = self.entries.len(), "Conversation log cleared");
        self.entries.clear();
    }

    /// Entries oldest-first, in insertion order.
    pub fn all(&self) -> &[ConversationEntry] {
        &self.entries
    }

    /// Entries most-recent-first, the order they are displayed in.
    pub fn latest_first(&self) -> impl Iterator<Item = &ConversationEntry> {
        self.entries.iter().rev()
    }

    pub fn get(&self, id: EntryId) -> Option<&ConversationEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Export the log oldest-first as a pretty-printed JSON array.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }
}
