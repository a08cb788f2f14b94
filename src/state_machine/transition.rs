//! Pure state transition function

use super::{ConvState, Effect, Event};
use crate::conversation::notice;
use crate::gateway::{ReactionOutcome, Recommendation, SessionId, StartOutcome};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A request is already in flight, wait for it to finish")]
    Busy,
    #[error("Nothing to send")]
    EmptyInput,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same state, session and event it always yields the same result,
/// with no I/O. `session` is the conversation's active session, if any.
pub fn transition(
    state: &ConvState,
    session: Option<&SessionId>,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Single flight: user events are refused while busy
        // ============================================================
        (state, event) if state.is_busy() && event.is_user_event() => Err(TransitionError::Busy),

        // ============================================================
        // User events
        // ============================================================
        (ConvState::Idle, Event::UserSubmit { text }) => {
            let genre = text.trim().to_string();
            if genre.is_empty() {
                return Err(TransitionError::EmptyInput);
            }
            let normalized = normalize_genre(&genre);
            Ok(begin_request(ConvState::AwaitingStart { genre })
                .with_effect(Effect::user_text(text))
                .with_effect(Effect::StartSession { genre: normalized }))
        }

        // No session: the reaction is dropped without feedback
        (ConvState::Idle, Event::React { reaction }) => match session {
            None => Ok(TransitionResult::new(ConvState::Idle)),
            Some(session_id) => Ok(begin_request(ConvState::AwaitingReaction)
                .with_effect(Effect::SubmitReaction {
                    session_id: session_id.clone(),
                    reaction,
                })),
        },

        (ConvState::Idle, Event::RequestTop) => match session {
            None => Ok(TransitionResult::new(ConvState::Idle)
                .with_effect(Effect::notice(notice::TOP_NEEDS_SESSION))),
            Some(session_id) => Ok(begin_request(ConvState::AwaitingTop).with_effect(
                Effect::FetchTop {
                    session_id: session_id.clone(),
                },
            )),
        },

        (ConvState::Idle, Event::ListGenres) => {
            Ok(begin_request(ConvState::AwaitingCatalog { genre: None })
                .with_effect(Effect::ListGenres))
        }

        (ConvState::Idle, Event::BrowseGenre { genre }) => {
            let genre = genre.trim();
            if genre.is_empty() {
                return Err(TransitionError::EmptyInput);
            }
            Ok(begin_request(ConvState::AwaitingCatalog {
                genre: Some(genre.to_string()),
            })
            .with_effect(Effect::BrowseBooks {
                genre: normalize_genre(genre),
            }))
        }

        // ============================================================
        // Gateway completions
        // ============================================================
        (ConvState::AwaitingStart { genre }, Event::StartCompleted { result }) => {
            let done = finish_request();
            Ok(match result {
                Ok(StartOutcome::Started {
                    session_id,
                    recommendation,
                }) => done
                    .with_effect(Effect::SetSession(session_id))
                    .with_effect(Effect::card(recommendation)),
                Ok(StartOutcome::NoMatches) => done
                    .with_effect(Effect::ClearSession)
                    .with_effect(Effect::notice(notice::no_books(genre))),
                Err(_) => done.with_effect(Effect::notice(notice::START_FAILED)),
            })
        }

        (ConvState::AwaitingReaction, Event::ReactionCompleted { result }) => {
            let done = finish_request();
            Ok(match result {
                Ok(ReactionOutcome::Next(recommendation)) => {
                    done.with_effect(Effect::card(recommendation))
                }
                Ok(ReactionOutcome::Exhausted { .. }) => {
                    done.with_effect(Effect::notice(notice::EXHAUSTED))
                }
                Err(_) => done.with_effect(Effect::notice(notice::REACTION_FAILED)),
            })
        }

        (ConvState::AwaitingTop, Event::TopCompleted { result }) => {
            let done = finish_request();
            Ok(match result {
                Ok(recommendations) if recommendations.is_empty() => {
                    done.with_effect(Effect::notice(notice::TOP_EMPTY))
                }
                Ok(recommendations) => done.with_effect(Effect::ShowTop { recommendations }),
                Err(_) => done.with_effect(Effect::notice(notice::TOP_FAILED)),
            })
        }

        (ConvState::AwaitingCatalog { genre: None }, Event::GenresCompleted { result }) => {
            let done = finish_request();
            Ok(match result {
                Ok(genres) if genres.is_empty() => {
                    done.with_effect(Effect::notice(notice::GENRES_EMPTY))
                }
                Ok(genres) => done.with_effect(Effect::notice(format!(
                    "Available genres: {}",
                    genres.join(", ")
                ))),
                Err(_) => done.with_effect(Effect::notice(notice::GENRES_FAILED)),
            })
        }

        (ConvState::AwaitingCatalog { genre: Some(genre) }, Event::BooksCompleted { result }) => {
            let done = finish_request();
            Ok(match result {
                Ok(books) if books.is_empty() => {
                    done.with_effect(Effect::notice(notice::no_books(genre)))
                }
                Ok(books) => done.with_effect(Effect::notice(book_listing(genre, &books))),
                Err(_) => done.with_effect(Effect::notice(notice::START_FAILED)),
            })
        }

        // ============================================================
        // Invalid Transitions
        // ============================================================
        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {state:?} with event {event:?}"
        ))),
    }
}

/// Enter a busy state
fn begin_request(state: ConvState) -> TransitionResult {
    TransitionResult::new(state).with_effect(Effect::NotifyBusy(true))
}

/// Return to idle after a request
fn finish_request() -> TransitionResult {
    TransitionResult::new(ConvState::Idle).with_effect(Effect::NotifyBusy(false))
}

/// Genres go to the service trimmed and lowercased
fn normalize_genre(genre: &str) -> String {
    genre.trim().to_lowercase()
}

fn book_listing(genre: &str, books: &[Recommendation]) -> String {
    let mut listing = format!("Books in the {genre} genre:");
    for book in books {
        listing.push_str("\n- ");
        listing.push_str(&book.title);
        if !book.authors.is_empty() {
            listing.push_str(" by ");
            listing.push_str(&book.author_line());
        }
    }
    listing
}
