//! Conversation state types

/// Conversation state
///
/// Every state other than `Idle` has exactly one gateway call in flight.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConvState {
    /// Ready for user input, no pending operations
    #[default]
    Idle,

    /// Opening a session for a genre (as the user typed it, trimmed)
    AwaitingStart { genre: String },

    /// Reaction sent, waiting for the next recommendation
    AwaitingReaction,

    /// Top recommendations requested
    AwaitingTop,

    /// Genre list or catalog listing requested
    AwaitingCatalog { genre: Option<String> },
}

impl ConvState {
    /// Whether a request is outstanding
    pub fn is_busy(&self) -> bool {
        !matches!(self, ConvState::Idle)
    }

    /// Short name for logs
    pub fn label(&self) -> &'static str {
        match self {
            ConvState::Idle => "idle",
            ConvState::AwaitingStart { .. } => "awaiting_start",
            ConvState::AwaitingReaction => "awaiting_reaction",
            ConvState::AwaitingTop => "awaiting_top",
            ConvState::AwaitingCatalog { .. } => "awaiting_catalog",
        }
    }
}
