//! Events that can occur in a conversation

use crate::gateway::{GatewayError, Reaction, ReactionOutcome, Recommendation, StartOutcome};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    UserSubmit {
        text: String,
    },
    React {
        reaction: Reaction,
    },
    RequestTop,
    ListGenres,
    BrowseGenre {
        genre: String,
    },

    // Gateway events
    StartCompleted {
        result: Result<StartOutcome, GatewayError>,
    },
    ReactionCompleted {
        result: Result<ReactionOutcome, GatewayError>,
    },
    TopCompleted {
        result: Result<Vec<Recommendation>, GatewayError>,
    },
    GenresCompleted {
        result: Result<Vec<String>, GatewayError>,
    },
    BooksCompleted {
        result: Result<Vec<Recommendation>, GatewayError>,
    },
}

impl Event {
    /// Whether the event comes from the user rather than a finished request
    pub fn is_user_event(&self) -> bool {
        matches!(
            self,
            Event::UserSubmit { .. }
                | Event::React { .. }
                | Event::RequestTop
                | Event::ListGenres
                | Event::BrowseGenre { .. }
        )
    }
}
