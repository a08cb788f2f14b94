//! Gateway to the remote recommendation service
//!
//! Every call is a single request/response exchange. Nothing here retries,
//! times out or backs off; a failed call is reported once to the caller.

pub mod error;
mod http;
mod types;

pub use error::GatewayError;
pub use http::HttpGateway;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Session-scoped recommendation endpoints
#[async_trait]
pub trait SessionGateway: Send + Sync {
    /// Open a session for a genre and fetch its first recommendation
    async fn start_session(&self, genre: &str) -> Result<StartOutcome, GatewayError>;

    /// Send a like/dislike for the last recommendation and fetch the next one
    async fn submit_reaction(
        &self,
        session_id: &SessionId,
        reaction: Reaction,
    ) -> Result<ReactionOutcome, GatewayError>;

    /// Ranked recommendations for the session so far
    async fn fetch_top_recommendations(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<Recommendation>, GatewayError>;
}

/// Session-less catalog browsing
#[async_trait]
pub trait BookCatalog: Send + Sync {
    async fn list_genres(&self) -> Result<Vec<String>, GatewayError>;

    async fn books_by_genre(&self, genre: &str) -> Result<Vec<Recommendation>, GatewayError>;
}

#[async_trait]
impl<T: SessionGateway + ?Sized> SessionGateway for Arc<T> {
    async fn start_session(&self, genre: &str) -> Result<StartOutcome, GatewayError> {
        (**self).start_session(genre).await
    }

    async fn submit_reaction(
        &self,
        session_id: &SessionId,
        reaction: Reaction,
    ) -> Result<ReactionOutcome, GatewayError> {
        (**self).submit_reaction(session_id, reaction).await
    }

    async fn fetch_top_recommendations(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<Recommendation>, GatewayError> {
        (**self).fetch_top_recommendations(session_id).await
    }
}

#[async_trait]
impl<T: BookCatalog + ?Sized> BookCatalog for Arc<T> {
    async fn list_genres(&self) -> Result<Vec<String>, GatewayError> {
        (**self).list_genres().await
    }

    async fn books_by_genre(&self, genre: &str) -> Result<Vec<Recommendation>, GatewayError> {
        (**self).books_by_genre(genre).await
    }
}

/// Logging wrapper for gateways
///
/// This is the one place a failed call gets logged; callers only turn the
/// error into a chat notice.
pub struct LoggingGateway<G> {
    inner: G,
}

impl<G> LoggingGateway<G> {
    pub fn new(inner: G) -> Self {
        Self { inner }
    }
}

fn log_call<T>(
    operation: &'static str,
    started: Instant,
    result: &Result<T, GatewayError>,
    summarize: impl FnOnce(&T) -> String,
) {
    let duration = started.elapsed();
    match result {
        Ok(value) => {
            tracing::info!(
                operation,
                duration_ms = %duration.as_millis(),
                outcome = %summarize(value),
                "Gateway request completed"
            );
        }
        Err(e) => {
            tracing::error!(
                operation,
                duration_ms = %duration.as_millis(),
                kind = e.kind.as_str(),
                error = %e.message,
                "Gateway request failed"
            );
        }
    }
}

#[async_trait]
impl<G: SessionGateway> SessionGateway for LoggingGateway<G> {
    async fn start_session(&self, genre: &str) -> Result<StartOutcome, GatewayError> {
        let started = Instant::now();
        let result = self.inner.start_session(genre).await;
        log_call("start_session", started, &result, |outcome| match outcome {
            StartOutcome::Started { session_id, .. } => format!("started {session_id}"),
            StartOutcome::NoMatches => "no_matches".to_string(),
        });
        result
    }

    async fn submit_reaction(
        &self,
        session_id: &SessionId,
        reaction: Reaction,
    ) -> Result<ReactionOutcome, GatewayError> {
        let started = Instant::now();
        let result = self.inner.submit_reaction(session_id, reaction).await;
        log_call("submit_reaction", started, &result, |outcome| match outcome {
            ReactionOutcome::Next(rec) => format!("{} next {:?}", reaction.symbol(), rec.title),
            ReactionOutcome::Exhausted { message } => {
                format!("{} exhausted: {message}", reaction.symbol())
            }
        });
        result
    }

    async fn fetch_top_recommendations(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<Recommendation>, GatewayError> {
        let started = Instant::now();
        let result = self.inner.fetch_top_recommendations(session_id).await;
        log_call("fetch_top_recommendations", started, &result, |recs| {
            format!("{} recommendations", recs.len())
        });
        result
    }
}

#[async_trait]
impl<G: BookCatalog> BookCatalog for LoggingGateway<G> {
    async fn list_genres(&self) -> Result<Vec<String>, GatewayError> {
        let started = Instant::now();
        let result = self.inner.list_genres().await;
        log_call("list_genres", started, &result, |genres| {
            format!("{} genres", genres.len())
        });
        result
    }

    async fn books_by_genre(&self, genre: &str) -> Result<Vec<Recommendation>, GatewayError> {
        let started = Instant::now();
        let result = self.inner.books_by_genre(genre).await;
        log_call("books_by_genre", started, &result, |books| {
            format!("{} books", books.len())
        });
        result
    }
}
