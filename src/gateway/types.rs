//! Types exchanged with the recommendation service

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Opaque server-assigned session token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feedback on the most recently shown recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reaction {
    #[serde(rename = "👍")]
    Like,
    #[serde(rename = "👎")]
    Dislike,
}

impl Reaction {
    pub fn symbol(self) -> &'static str {
        match self {
            Reaction::Like => "👍",
            Reaction::Dislike => "👎",
        }
    }
}

/// A book as received from the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub authors: Vec<String>,
    /// Raw tags. Non-text tags from the service arrive here as empty strings.
    pub genres: Vec<String>,
    pub description: Option<String>,
}

/// Builders for fixtures; the service is the only real source of books
#[cfg(test)]
impl Recommendation {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            authors: vec![author.into()],
            genres: Vec::new(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Recommendation {
    /// Tags fit for display: trimmed, blanks dropped
    pub fn display_genres(&self) -> Vec<&str> {
        self.genres
            .iter()
            .map(|g| g.trim())
            .filter(|g| !g.is_empty())
            .collect()
    }

    pub fn author_line(&self) -> String {
        self.authors.join(", ")
    }
}

/// Result of opening a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    Started {
        session_id: SessionId,
        recommendation: Recommendation,
    },
    /// The service found nothing for the genre
    NoMatches,
}

/// Result of submitting a reaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionOutcome {
    Next(Recommendation),
    /// The service has nothing left to recommend in this session
    Exhausted { message: String },
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
pub(super) struct StartRequest<'a> {
    pub genre: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct ReactionRequest<'a> {
    pub session_id: &'a SessionId,
    pub reaction: Reaction,
}

#[derive(Debug, Serialize)]
pub(super) struct TopRequest<'a> {
    pub session_id: &'a SessionId,
}

/// `author` is a plain string in some service versions and a list in others
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum AuthorField {
    One(String),
    Many(Vec<Value>),
}

impl AuthorField {
    fn into_names(self) -> Vec<String> {
        match self {
            AuthorField::One(name) => vec![name],
            AuthorField::Many(values) => values
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        }
    }
}

/// Book fields shared by the start, recommend and top replies
#[derive(Debug, Default, Deserialize)]
pub(super) struct BookPayload {
    #[serde(default)]
    pub book: Option<String>,
    #[serde(default)]
    pub author: Option<AuthorField>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub genres: Option<Vec<Value>>,
}

impl BookPayload {
    /// `None` when the payload carries no title
    pub fn into_recommendation(self) -> Option<Recommendation> {
        let title = self.book?;
        let authors = self.author.map(AuthorField::into_names).unwrap_or_default();
        let genres = self
            .genres
            .unwrap_or_default()
            .into_iter()
            .map(|g| match g {
                Value::String(s) => s,
                _ => String::new(),
            })
            .collect();
        let description = match self.description {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
            _ => None,
        };
        Some(Recommendation {
            title,
            authors,
            genres,
            description,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct StartReply {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub book: BookPayload,
}

impl StartReply {
    /// The session id, unless it is missing or blank
    pub fn usable_session_id(&self) -> Option<String> {
        self.session_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ReactionReply {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub book: BookPayload,
}

#[derive(Debug, Deserialize)]
pub(super) struct TopReply {
    #[serde(default)]
    pub recommendations: Vec<BookPayload>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CatalogAuthor {
    pub name: String,
}

/// Entry of the catalog listing, `{ title, authors: [{ name }] }`
#[derive(Debug, Deserialize)]
pub(super) struct CatalogBook {
    pub title: String,
    #[serde(default)]
    pub authors: Vec<CatalogAuthor>,
}

impl From<CatalogBook> for Recommendation {
    fn from(book: CatalogBook) -> Self {
        Recommendation {
            title: book.title,
            authors: book.authors.into_iter().map(|a| a.name).collect(),
            genres: Vec::new(),
            description: None,
        }
    }
}
