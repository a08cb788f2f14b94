//! Conversation store: append-only chat history plus the active session

use crate::gateway::{Recommendation, SessionId};

/// User-visible notices, kept together so wording stays consistent
pub mod notice {
    pub const WELCOME: &str = "Hello! I can help you find book recommendations based on genres. Type a genre to get started!";
    pub const START_FAILED: &str = "Error loading books, please try again.";
    pub const REACTION_FAILED: &str = "Error fetching the next recommendation.";
    pub const EXHAUSTED: &str = "No more books to recommend in this genre.";
    pub const TOP_FAILED: &str = "Error loading top recommendations.";
    pub const TOP_EMPTY: &str = "No top recommendations yet.";
    pub const TOP_NEEDS_SESSION: &str = "Pick a genre first, then ask for top recommendations.";
    pub const GENRES_FAILED: &str = "Error loading genres.";
    pub const GENRES_EMPTY: &str = "No genres available.";

    pub fn no_books(genre: &str) -> String {
        format!("No books in the {genre} genre.")
    }
}

/// Who produced an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    User,
    System,
}

/// Body of an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryContent {
    Text(String),
    Recommendation(Recommendation),
}

/// One rendered unit of the chat history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub content: EntryContent,
    pub origin: Origin,
}

impl ChatEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            content: EntryContent::Text(text.into()),
            origin: Origin::User,
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self {
            content: EntryContent::Text(text.into()),
            origin: Origin::System,
        }
    }

    pub fn card(recommendation: Recommendation) -> Self {
        Self {
            content: EntryContent::Recommendation(recommendation),
            origin: Origin::System,
        }
    }

    pub fn is_user(&self) -> bool {
        self.origin == Origin::User
    }

    pub fn text(&self) -> Option<&str> {
        match &self.content {
            EntryContent::Text(text) => Some(text),
            EntryContent::Recommendation(_) => None,
        }
    }

    pub fn recommendation(&self) -> Option<&Recommendation> {
        match &self.content {
            EntryContent::Recommendation(rec) => Some(rec),
            EntryContent::Text(_) => None,
        }
    }
}

/// Ordered chat history and the session it currently belongs to
///
/// Entries are only ever appended. A new session shadows the old one; the
/// history stays.
#[derive(Debug, Default)]
pub struct ConversationStore {
    entries: Vec<ChatEntry>,
    session: Option<SessionId>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, returning its index
    pub fn append(&mut self, entry: ChatEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)] // Pairs with len()
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn session(&self) -> Option<&SessionId> {
        self.session.as_ref()
    }

    pub fn set_session(&mut self, session_id: SessionId) {
        self.session = Some(session_id);
    }

    pub fn clear_session(&mut self) {
        self.session = None;
    }
}
