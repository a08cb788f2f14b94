//! Runtime for executing conversations
//!
//! Owns the conversation state and store on a single task. Gateway calls run
//! on spawned tasks and report back as events.

mod executor;


pub use executor::ConversationRuntime;

use crate::conversation::{ChatEntry, ConversationStore};
use crate::gateway::{BookCatalog, Recommendation, SessionGateway, SessionId};
use crate::state_machine::Event;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Events sent to the front end
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// An entry was added at `index`
    EntryAppended { index: usize, entry: ChatEntry },
    /// A request started or finished
    Busy(bool),
    /// Top recommendations arrived; open the panel
    TopRecommendations {
        recommendations: Vec<Recommendation>,
    },
    SessionChanged { session_id: Option<SessionId> },
    /// A user action was refused (busy, blank input)
    Rejected { reason: String },
}

/// Handle to interact with a running conversation
pub struct ConversationHandle {
    event_tx: mpsc::Sender<Event>,
    task: JoinHandle<ConversationStore>,
}

impl ConversationHandle {
    /// Start a runtime on its own task.
    ///
    /// The returned receiver is subscribed before the runtime starts, so it
    /// sees the welcome entry.
    pub fn spawn<G>(gateway: G) -> (Self, broadcast::Receiver<ChatEvent>)
    where
        G: SessionGateway + BookCatalog + 'static,
    {
        let (event_tx, event_rx) = mpsc::channel(32);
        let (broadcast_tx, broadcast_rx) = broadcast::channel(128);

        let runtime = ConversationRuntime::new(gateway, event_rx, broadcast_tx);
        let task = tokio::spawn(runtime.run());

        (Self { event_tx, task }, broadcast_rx)
    }

    /// Queue an event; fails only once the runtime has stopped
    pub async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>> {
        self.event_tx.send(event).await
    }

    /// Stop the runtime and hand back the conversation it built
    ///
    /// A request still in flight is abandoned.
    pub async fn shutdown(self) -> Option<ConversationStore> {
        drop(self.event_tx);
        match self.task.await {
            Ok(store) => Some(store),
            Err(e) => {
                tracing::error!(error = %e, "Conversation runtime panicked");
                None
            }
        }
    }
}
