//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use crate::conversation::{notice, ChatEntry};
use crate::gateway::error::GatewayErrorKind;
use crate::gateway::{
    GatewayError, Reaction, ReactionOutcome, Recommendation, SessionId, StartOutcome,
};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_reaction() -> impl Strategy<Value = Reaction> {
    prop_oneof![Just(Reaction::Like), Just(Reaction::Dislike)]
}

fn arb_session() -> impl Strategy<Value = Option<SessionId>> {
    proptest::option::of("[a-f0-9]{8}".prop_map(SessionId::new))
}

fn arb_recommendation() -> impl Strategy<Value = Recommendation> {
    (
        "[A-Z][a-z]{1,12}",
        "[A-Z][a-z]{1,8} [A-Z][a-z]{1,8}",
        proptest::collection::vec("[a-z -]{0,10}", 0..4),
    )
        .prop_map(|(title, author, genres)| Recommendation::new(title, author).with_genres(genres))
}

fn arb_error() -> impl Strategy<Value = GatewayError> {
    (
        prop_oneof![
            Just(GatewayErrorKind::Network),
            Just(GatewayErrorKind::Server),
            Just(GatewayErrorKind::InvalidRequest),
            Just(GatewayErrorKind::Decode),
            Just(GatewayErrorKind::Unknown),
        ],
        "[a-z ]{1,20}",
    )
        .prop_map(|(kind, message)| GatewayError::new(kind, message))
}

fn arb_busy_state() -> impl Strategy<Value = ConvState> {
    prop_oneof![
        "[A-Za-z ]{1,12}".prop_map(|genre| ConvState::AwaitingStart { genre }),
        Just(ConvState::AwaitingReaction),
        Just(ConvState::AwaitingTop),
        proptest::option::of("[a-z]{1,10}").prop_map(|genre| ConvState::AwaitingCatalog { genre }),
    ]
}

fn arb_state() -> impl Strategy<Value = ConvState> {
    prop_oneof![Just(ConvState::Idle), arb_busy_state()]
}

fn arb_user_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[A-Za-z \t]{0,20}".prop_map(|text| Event::UserSubmit { text }),
        arb_reaction().prop_map(|reaction| Event::React { reaction }),
        Just(Event::RequestTop),
        Just(Event::ListGenres),
        "[A-Za-z ]{0,12}".prop_map(|genre| Event::BrowseGenre { genre }),
    ]
}

fn arb_start_result() -> impl Strategy<Value = Result<StartOutcome, GatewayError>> {
    prop_oneof![
        ("[a-f0-9]{8}", arb_recommendation()).prop_map(|(id, recommendation)| Ok(
            StartOutcome::Started {
                session_id: SessionId::new(id),
                recommendation,
            }
        )),
        Just(Ok(StartOutcome::NoMatches)),
        arb_error().prop_map(Err),
    ]
}

fn arb_reaction_result() -> impl Strategy<Value = Result<ReactionOutcome, GatewayError>> {
    prop_oneof![
        arb_recommendation().prop_map(|r| Ok(ReactionOutcome::Next(r))),
        "[a-z ]{1,20}".prop_map(|message| Ok(ReactionOutcome::Exhausted { message })),
        arb_error().prop_map(Err),
    ]
}

fn arb_list_result() -> impl Strategy<Value = Result<Vec<Recommendation>, GatewayError>> {
    prop_oneof![
        proptest::collection::vec(arb_recommendation(), 0..4).prop_map(Ok),
        arb_error().prop_map(Err),
    ]
}

fn arb_completion_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_start_result().prop_map(|result| Event::StartCompleted { result }),
        arb_reaction_result().prop_map(|result| Event::ReactionCompleted { result }),
        arb_list_result().prop_map(|result| Event::TopCompleted { result }),
        prop_oneof![
            proptest::collection::vec("[a-z]{1,8}", 0..4).prop_map(Ok),
            arb_error().prop_map(Err),
        ]
        .prop_map(|result| Event::GenresCompleted { result }),
        arb_list_result().prop_map(|result| Event::BooksCompleted { result }),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![arb_user_event(), arb_completion_event()]
}

/// A busy state paired with a failed completion of its own request
fn arb_failed_request() -> impl Strategy<Value = (ConvState, Event)> {
    arb_error().prop_flat_map(|error| {
        let e = error.clone();
        prop_oneof![
            Just((
                ConvState::AwaitingStart {
                    genre: "fantasy".to_string()
                },
                Event::StartCompleted {
                    result: Err(e.clone())
                }
            )),
            Just((
                ConvState::AwaitingReaction,
                Event::ReactionCompleted {
                    result: Err(e.clone())
                }
            )),
            Just((
                ConvState::AwaitingTop,
                Event::TopCompleted {
                    result: Err(e.clone())
                }
            )),
            Just((
                ConvState::AwaitingCatalog { genre: None },
                Event::GenresCompleted {
                    result: Err(e.clone())
                }
            )),
            Just((
                ConvState::AwaitingCatalog {
                    genre: Some("horror".to_string())
                },
                Event::BooksCompleted { result: Err(e) }
            )),
        ]
    })
}

fn appended(effects: &[Effect]) -> Vec<&ChatEntry> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::AppendEntry(entry) => Some(entry),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Blank input never produces an entry or a request
    #[test]
    fn prop_blank_submit_is_rejected(
        text in "[ \t\n]{0,10}",
        session in arb_session(),
    ) {
        let result = transition(&ConvState::Idle, session.as_ref(), Event::UserSubmit { text });
        prop_assert_eq!(result.unwrap_err(), TransitionError::EmptyInput);
    }

    /// While a request is in flight no user event gets through
    #[test]
    fn prop_busy_rejects_user_events(
        state in arb_busy_state(),
        session in arb_session(),
        event in arb_user_event(),
    ) {
        let result = transition(&state, session.as_ref(), event);
        prop_assert_eq!(result.unwrap_err(), TransitionError::Busy);
    }

    /// At most one request per transition, and only when entering a busy state
    #[test]
    fn prop_single_flight(
        state in arb_state(),
        session in arb_session(),
        event in arb_event(),
    ) {
        if let Ok(result) = transition(&state, session.as_ref(), event) {
            let requests = result.effects.iter().filter(|e| e.is_request()).count();
            prop_assert!(requests <= 1);
            if requests == 1 {
                prop_assert!(!state.is_busy());
                prop_assert!(result.new_state.is_busy());
            }
        }
    }

    /// Busy notifications match the state change exactly
    #[test]
    fn prop_busy_notification_tracks_state(
        state in arb_state(),
        session in arb_session(),
        event in arb_event(),
    ) {
        if let Ok(result) = transition(&state, session.as_ref(), event) {
            let notified: Vec<bool> = result
                .effects
                .iter()
                .filter_map(|e| match e {
                    Effect::NotifyBusy(b) => Some(*b),
                    _ => None,
                })
                .collect();
            if state.is_busy() == result.new_state.is_busy() {
                prop_assert!(notified.is_empty());
            } else {
                prop_assert_eq!(notified, vec![result.new_state.is_busy()]);
            }
        }
    }

    /// Every completion returns to idle
    #[test]
    fn prop_completion_returns_to_idle(
        state in arb_busy_state(),
        session in arb_session(),
        event in arb_completion_event(),
    ) {
        if let Ok(result) = transition(&state, session.as_ref(), event) {
            prop_assert_eq!(result.new_state, ConvState::Idle);
        }
    }

    /// A failed request yields exactly one generic notice and leaves the session alone
    #[test]
    fn prop_failure_appends_one_notice(
        (state, event) in arb_failed_request(),
        session in arb_session(),
    ) {
        let result = transition(&state, session.as_ref(), event).unwrap();
        let entries = appended(&result.effects);
        prop_assert_eq!(entries.len(), 1);
        prop_assert!(!entries[0].is_user());
        let text = entries[0].text().unwrap_or_default();
        prop_assert!(
            [
                notice::START_FAILED,
                notice::REACTION_FAILED,
                notice::TOP_FAILED,
                notice::GENRES_FAILED,
            ]
            .contains(&text)
        );
        prop_assert!(!result
            .effects
            .iter()
            .any(|e| matches!(e, Effect::SetSession(_) | Effect::ClearSession)));
    }

    /// A reaction with no session is a silent no-op
    #[test]
    fn prop_reaction_without_session_is_silent(reaction in arb_reaction()) {
        let result = transition(&ConvState::Idle, None, Event::React { reaction }).unwrap();
        prop_assert_eq!(result.new_state, ConvState::Idle);
        prop_assert!(result.effects.is_empty());
    }

    /// A successful start appends the user's text before the card
    #[test]
    fn prop_successful_start_orders_entries(
        text in "[A-Za-z]{1,12}",
        id in "[a-f0-9]{8}",
        recommendation in arb_recommendation(),
    ) {
        let sent = transition(&ConvState::Idle, None, Event::UserSubmit { text: text.clone() }).unwrap();
        let done = transition(
            &sent.new_state,
            None,
            Event::StartCompleted {
                result: Ok(StartOutcome::Started {
                    session_id: SessionId::new(id.clone()),
                    recommendation: recommendation.clone(),
                }),
            },
        )
        .unwrap();

        let mut effects = sent.effects;
        effects.extend(done.effects);
        let entries = appended(&effects);
        prop_assert_eq!(entries.len(), 2);
        prop_assert_eq!(entries[0], &ChatEntry::user(text));
        prop_assert_eq!(entries[1], &ChatEntry::card(recommendation));
        prop_assert!(effects.contains(&Effect::SetSession(SessionId::new(id))));
    }
}
