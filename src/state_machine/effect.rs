//! Effects produced by state transitions

use crate::conversation::ChatEntry;
use crate::gateway::{Reaction, Recommendation, SessionId};

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append to the conversation history
    AppendEntry(ChatEntry),

    /// Replace the active session
    SetSession(SessionId),

    /// Drop the active session
    ClearSession,

    /// Call `start_session` with a normalized genre
    StartSession { genre: String },

    /// Call `submit_reaction`
    SubmitReaction {
        session_id: SessionId,
        reaction: Reaction,
    },

    /// Call `fetch_top_recommendations`
    FetchTop { session_id: SessionId },

    /// Call `list_genres`
    ListGenres,

    /// Call `books_by_genre`
    BrowseBooks { genre: String },

    /// Open the top recommendations panel
    ShowTop { recommendations: Vec<Recommendation> },

    /// Tell the front end whether a request is in flight
    NotifyBusy(bool),
}

impl Effect {
    pub fn user_text(text: impl Into<String>) -> Self {
        Effect::AppendEntry(ChatEntry::user(text))
    }

    pub fn notice(text: impl Into<String>) -> Self {
        Effect::AppendEntry(ChatEntry::system(text))
    }

    pub fn card(recommendation: Recommendation) -> Self {
        Effect::AppendEntry(ChatEntry::card(recommendation))
    }

    /// Whether executing this effect issues a gateway call
    pub fn is_request(&self) -> bool {
        matches!(
            self,
            Effect::StartSession { .. }
                | Effect::SubmitReaction { .. }
                | Effect::FetchTop { .. }
                | Effect::ListGenres
                | Effect::BrowseBooks { .. }
        )
    }
}
