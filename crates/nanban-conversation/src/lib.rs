//! Nanban Conversation crate - the running conversation timeline.
//!
//! Merges speech results (with their derived gloss) and sign results (with
//! their ranked candidates) into one append-only log.

pub mod timeline;

pub use timeline::{ConversationEntry, ConversationLog, EntryDraft, EntryId, EntryKind};
