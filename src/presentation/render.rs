//! Rendering chat entries as terminal lines

use super::panel::TopPanel;
use crate::conversation::{ChatEntry, EntryContent};
use crate::gateway::{Recommendation, SessionId};
use crate::runtime::ChatEvent;
use crate::state_machine::Event;
use crossterm::style::Stylize;

const USER_MARKER: &str = "you>";
const BOT_MARKER: &str = "bot>";
const INDENT: &str = "     ";

/// Visual role of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    User,
    Bot,
    Card,
    Hint,
    Panel,
}

/// One line of output, unstyled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub tone: Tone,
    pub text: String,
}

impl Line {
    fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }

    /// The line with terminal colours applied
    pub fn styled(&self) -> String {
        let text = self.text.as_str();
        match self.tone {
            Tone::User => text.cyan().to_string(),
            Tone::Bot => text.to_string(),
            Tone::Card => text.bold().to_string(),
            Tone::Hint => text.dark_grey().to_string(),
            Tone::Panel => text.yellow().to_string(),
        }
    }
}

/// Lines for one entry. User entries are right-aligned to `width`.
pub fn entry_lines(entry: &ChatEntry, width: usize) -> Vec<Line> {
    match &entry.content {
        EntryContent::Text(text) if entry.is_user() => {
            let line = format!("{USER_MARKER} {}", text.trim());
            vec![Line::new(Tone::User, format!("{line:>width$}"))]
        }
        EntryContent::Text(text) => text
            .lines()
            .enumerate()
            .map(|(i, line)| {
                let marker = if i == 0 { BOT_MARKER } else { "    " };
                Line::new(Tone::Bot, format!("{marker} {line}"))
            })
            .collect(),
        EntryContent::Recommendation(rec) => card_lines(rec),
    }
}

/// A recommendation card with its reaction hints
pub fn card_lines(rec: &Recommendation) -> Vec<Line> {
    let mut lines = vec![Line::new(Tone::Card, format!("{BOT_MARKER} {}", rec.title))];
    if !rec.authors.is_empty() {
        lines.push(Line::new(
            Tone::Bot,
            format!("{INDENT}By {}", rec.author_line()),
        ));
    }
    let genres = rec.display_genres();
    if !genres.is_empty() {
        let tags: Vec<String> = genres.iter().map(|g| format!("[{g}]")).collect();
        lines.push(Line::new(Tone::Bot, format!("{INDENT}{}", tags.join(" "))));
    }
    if let Some(description) = &rec.description {
        lines.push(Line::new(Tone::Bot, format!("{INDENT}{description}")));
    }
    lines.push(Line::new(Tone::Hint, format!("{INDENT}/like  /dislike")));
    lines
}

/// Front-end view state driven by runtime events
#[derive(Debug)]
pub struct ChatView {
    width: usize,
    busy: bool,
    /// Entries rendered so far; a gap means broadcast lag dropped some
    shown: usize,
    session: Option<SessionId>,
    panel: TopPanel,
}

impl ChatView {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            busy: false,
            shown: 0,
            session: None,
            panel: TopPanel::default(),
        }
    }

    /// Apply a runtime event and return the lines to print
    pub fn apply(&mut self, event: &ChatEvent) -> Vec<Line> {
        match event {
            ChatEvent::EntryAppended { index, entry } => {
                let mut lines = Vec::new();
                if *index > self.shown {
                    lines.push(Line::new(
                        Tone::Hint,
                        format!("({} earlier messages not shown)", index - self.shown),
                    ));
                }
                self.shown = index + 1;
                lines.extend(entry_lines(entry, self.width));
                lines
            }
            ChatEvent::Busy(busy) => {
                self.busy = *busy;
                if *busy {
                    vec![Line::new(Tone::Hint, format!("{BOT_MARKER} thinking..."))]
                } else {
                    vec![]
                }
            }
            ChatEvent::TopRecommendations { recommendations } => {
                self.panel.open(recommendations.clone());
                self.panel
                    .lines()
                    .into_iter()
                    .map(|text| Line::new(Tone::Panel, text))
                    .collect()
            }
            ChatEvent::SessionChanged { session_id } => {
                self.session.clone_from(session_id);
                vec![]
            }
            ChatEvent::Rejected { reason } => vec![Line::new(Tone::Hint, format!("({reason})"))],
        }
    }

    /// Close the panel ahead of other input
    pub fn dismiss_panel(&mut self) -> Vec<Line> {
        if self.panel.is_open() {
            self.panel.close();
            vec![Line::new(Tone::Hint, "(top recommendations closed)")]
        } else {
            vec![]
        }
    }

    /// Whether the runtime answers `event` with output of its own
    ///
    /// A reaction with no session is dropped without a word.
    pub fn expects_reply(&self, event: &Event) -> bool {
        !matches!(event, Event::React { .. }) || self.session.is_some()
    }

    /// Clear the busy flag after broadcast lag, since a missed `Busy(false)`
    /// would otherwise hold it forever. The runtime still refuses a second
    /// request on its own.
    pub fn resync(&mut self) -> Vec<Line> {
        self.busy = false;
        vec![Line::new(Tone::Hint, "(some updates were missed)")]
    }

    pub fn prompt(&self) -> &'static str {
        match (self.busy, &self.session) {
            (true, _) => "... ",
            (false, Some(_)) => "genre or /like /dislike /top > ",
            (false, None) => "genre > ",
        }
    }
}
