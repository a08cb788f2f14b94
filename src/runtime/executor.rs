//! Conversation runtime executor

use super::ChatEvent;
use crate::conversation::{notice, ChatEntry, ConversationStore};
use crate::gateway::{BookCatalog, SessionGateway};
use crate::state_machine::{transition, ConvState, Effect, Event, TransitionError};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// Generic conversation runtime that can work with any gateway implementation
pub struct ConversationRuntime<G>
where
    G: SessionGateway + BookCatalog + 'static,
{
    state: ConvState,
    store: ConversationStore,
    gateway: Arc<G>,
    /// User events from the front end
    event_rx: mpsc::Receiver<Event>,
    /// Completions from spawned gateway calls
    completion_tx: mpsc::Sender<Event>,
    completion_rx: mpsc::Receiver<Event>,
    broadcast_tx: broadcast::Sender<ChatEvent>,
    /// Set once the welcome entry has been appended
    welcomed: bool,
}

impl<G> ConversationRuntime<G>
where
    G: SessionGateway + BookCatalog + 'static,
{
    pub fn new(
        gateway: G,
        event_rx: mpsc::Receiver<Event>,
        broadcast_tx: broadcast::Sender<ChatEvent>,
    ) -> Self {
        let (completion_tx, completion_rx) = mpsc::channel(8);
        Self {
            state: ConvState::Idle,
            store: ConversationStore::new(),
            gateway: Arc::new(gateway),
            event_rx,
            completion_tx,
            completion_rx,
            broadcast_tx,
            welcomed: false,
        }
    }

    /// Process events until the front end goes away, then return the history
    pub async fn run(mut self) -> ConversationStore {
        tracing::info!("Starting conversation runtime");
        self.welcome();

        loop {
            let event = tokio::select! {
                biased;

                Some(event) = self.completion_rx.recv() => event,

                incoming = self.event_rx.recv() => match incoming {
                    Some(event) => event,
                    None => break,
                },
            };
            self.process_event(event);
        }

        if self.state.is_busy() {
            tracing::warn!(state = self.state.label(), "Stopping with a request in flight");
        }
        tracing::info!(entries = self.store.len(), "Conversation runtime stopped");
        self.store
    }

    /// Greet once per conversation
    fn welcome(&mut self) {
        if self.welcomed {
            return;
        }
        self.welcomed = true;
        self.append(ChatEntry::system(notice::WELCOME));
    }

    fn process_event(&mut self, event: Event) {
        let result = match transition(&self.state, self.store.session(), event) {
            Ok(r) => r,
            Err(e) => {
                match &e {
                    TransitionError::Busy | TransitionError::EmptyInput => {
                        tracing::debug!(state = self.state.label(), reason = %e, "Ignoring user event");
                    }
                    TransitionError::InvalidTransition(_) => {
                        tracing::warn!(error = %e, "Dropping event");
                    }
                }
                let _ = self.broadcast_tx.send(ChatEvent::Rejected {
                    reason: e.to_string(),
                });
                return;
            }
        };

        debug_assert!(result.effects.iter().filter(|e| e.is_request()).count() <= 1);
        if result.effects.is_empty() {
            tracing::debug!(state = self.state.label(), "Event produced no effects");
        }

        let old_state = std::mem::replace(&mut self.state, result.new_state);
        if old_state != self.state {
            tracing::debug!(from = old_state.label(), to = self.state.label(), "State changed");
        }

        for effect in result.effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::AppendEntry(entry) => self.append(entry),

            Effect::SetSession(session_id) => {
                tracing::info!(session_id = %session_id, "Session started");
                self.store.set_session(session_id.clone());
                let _ = self.broadcast_tx.send(ChatEvent::SessionChanged {
                    session_id: Some(session_id),
                });
            }

            Effect::ClearSession => {
                if self.store.session().is_some() {
                    self.store.clear_session();
                    let _ = self
                        .broadcast_tx
                        .send(ChatEvent::SessionChanged { session_id: None });
                }
            }

            Effect::StartSession { genre } => self.spawn_request(|gateway| async move {
                Event::StartCompleted {
                    result: gateway.start_session(&genre).await,
                }
            }),

            Effect::SubmitReaction {
                session_id,
                reaction,
            } => self.spawn_request(|gateway| async move {
                Event::ReactionCompleted {
                    result: gateway.submit_reaction(&session_id, reaction).await,
                }
            }),

            Effect::FetchTop { session_id } => self.spawn_request(|gateway| async move {
                Event::TopCompleted {
                    result: gateway.fetch_top_recommendations(&session_id).await,
                }
            }),

            Effect::ListGenres => self.spawn_request(|gateway| async move {
                Event::GenresCompleted {
                    result: gateway.list_genres().await,
                }
            }),

            Effect::BrowseBooks { genre } => self.spawn_request(|gateway| async move {
                Event::BooksCompleted {
                    result: gateway.books_by_genre(&genre).await,
                }
            }),

            Effect::ShowTop { recommendations } => {
                let _ = self
                    .broadcast_tx
                    .send(ChatEvent::TopRecommendations { recommendations });
            }

            Effect::NotifyBusy(busy) => {
                let _ = self.broadcast_tx.send(ChatEvent::Busy(busy));
            }
        }
    }

    fn append(&mut self, entry: ChatEntry) {
        let index = self.store.append(entry.clone());
        tracing::debug!(
            index,
            user = entry.is_user(),
            text = ?entry.text(),
            card = ?entry.recommendation().map(|r| r.title.as_str()),
            "Entry appended"
        );
        let _ = self
            .broadcast_tx
            .send(ChatEvent::EntryAppended { index, entry });
    }

    /// Run a gateway call in the background and feed its completion back in
    fn spawn_request<F, Fut>(&self, request: F)
    where
        F: FnOnce(Arc<G>) -> Fut,
        Fut: Future<Output = Event> + Send + 'static,
    {
        let call = request(Arc::clone(&self.gateway));
        let completion_tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let event = call.await;
            if completion_tx.send(event).await.is_err() {
                tracing::debug!("Runtime stopped, dropping gateway result");
            }
        });
    }
}
