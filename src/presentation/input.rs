//! Input surface and command parsing

/// The single pending line of user input
#[derive(Debug, Default)]
pub struct InputSurface {
    pending: String,
    busy: bool,
}

impl InputSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pending line
    pub fn set(&mut self, text: impl Into<String>) {
        self.pending = text.into();
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Take the pending line for sending.
    ///
    /// Returns `None` and keeps the text when the line is blank or a request
    /// is in flight.
    pub fn submit(&mut self) -> Option<String> {
        if self.busy || self.pending.trim().is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.pending))
    }
}

/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Like,
    Dislike,
    Top,
    Close,
    Genres,
    Books(String),
    Help,
    Quit,
    /// Anything that is not a known command is a genre
    Genre(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let (name, arg) = match trimmed.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (trimmed, ""),
        };
        match (name, arg) {
            ("/like", "") => Self::Like,
            ("/dislike", "") => Self::Dislike,
            ("/top", "") => Self::Top,
            ("/close", "") => Self::Close,
            ("/genres", "") => Self::Genres,
            ("/books", genre) => Self::Books(genre.to_string()),
            ("/help", _) => Self::Help,
            ("/quit" | "/exit", "") => Self::Quit,
            _ => Self::Genre(line.to_string()),
        }
    }

    /// Whether the command closes an open top panel on its own
    ///
    /// `/top` replaces the panel instead.
    pub fn dismisses_panel(&self) -> bool {
        !matches!(self, Self::Top)
    }
}

pub const HELP: &[&str] = &[
    "Type a genre (e.g. fantasy) to get a recommendation.",
    "/like, /dislike   react to the last recommendation",
    "/top              show top recommendations for this session",
    "/close            close the top recommendations panel",
    "/genres           list available genres",
    "/books <genre>    list books in a genre",
    "/quit             leave",
];
