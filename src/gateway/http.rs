//! reqwest-backed gateway

use super::types::{
    CatalogBook, ReactionReply, ReactionRequest, StartReply, StartRequest, TopReply, TopRequest,
};
use super::{
    BookCatalog, GatewayError, Reaction, ReactionOutcome, Recommendation, SessionGateway,
    SessionId, StartOutcome,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Gateway speaking JSON over HTTP to the recommendation service
///
/// The client is built without a timeout; a call waits as long as the
/// service takes.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(StatusCode, String), GatewayError> {
        Self::send(self.client.post(self.url(path)).json(body)).await
    }

    async fn send(request: RequestBuilder) -> Result<(StatusCode, String), GatewayError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::network(format!("Request timeout: {e}"))
            } else if e.is_connect() || e.is_request() {
                GatewayError::network(format!("Connection failed: {e}"))
            } else {
                GatewayError::unknown(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::network(format!("Failed to read response: {e}")))?;
        Ok((status, body))
    }

    fn classify_error(status: StatusCode, body: &str) -> GatewayError {
        match status.as_u16() {
            400..=499 => GatewayError::invalid_request(format!("HTTP {status}: {body}")),
            500..=599 => GatewayError::server_error(format!("Server error: {body}")),
            _ => GatewayError::unknown(format!("HTTP {status}: {body}")),
        }
    }

    fn decode<T: DeserializeOwned>(body: &str) -> Result<T, GatewayError> {
        serde_json::from_str(body).map_err(|e| {
            GatewayError::decode(format!("Failed to parse response: {e} - body: {body}"))
        })
    }

    fn expect_success(status: StatusCode, body: &str) -> Result<(), GatewayError> {
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::classify_error(status, body))
        }
    }
}

#[async_trait]
impl SessionGateway for HttpGateway {
    async fn start_session(&self, genre: &str) -> Result<StartOutcome, GatewayError> {
        let (status, body) = self.post_json("/start", &StartRequest { genre }).await?;

        // The service answers an unknown genre with 400 and a bare message
        if status.is_client_error() {
            if let Ok(reply) = serde_json::from_str::<StartReply>(&body) {
                if reply.usable_session_id().is_none() && reply.message.is_some() {
                    return Ok(StartOutcome::NoMatches);
                }
            }
        }
        Self::expect_success(status, &body)?;

        let reply: StartReply = Self::decode(&body)?;
        let Some(session_id) = reply.usable_session_id() else {
            return Ok(StartOutcome::NoMatches);
        };
        let recommendation = reply.book.into_recommendation().ok_or_else(|| {
            GatewayError::decode(format!("Session {session_id} started without a book"))
        })?;

        Ok(StartOutcome::Started {
            session_id: SessionId::new(session_id),
            recommendation,
        })
    }

    async fn submit_reaction(
        &self,
        session_id: &SessionId,
        reaction: Reaction,
    ) -> Result<ReactionOutcome, GatewayError> {
        let request = ReactionRequest {
            session_id,
            reaction,
        };
        let (status, body) = self.post_json("/recommend", &request).await?;
        Self::expect_success(status, &body)?;

        let reply: ReactionReply = Self::decode(&body)?;
        let message = reply.message;
        match reply.book.into_recommendation() {
            Some(recommendation) => Ok(ReactionOutcome::Next(recommendation)),
            None => message
                .map(|message| ReactionOutcome::Exhausted { message })
                .ok_or_else(|| GatewayError::decode(format!("Reply had no book: {body}"))),
        }
    }

    async fn fetch_top_recommendations(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<Recommendation>, GatewayError> {
        let (status, body) = self
            .post_json("/top_recommendations", &TopRequest { session_id })
            .await?;
        Self::expect_success(status, &body)?;

        let reply: TopReply = Self::decode(&body)?;
        Ok(reply
            .recommendations
            .into_iter()
            .filter_map(super::types::BookPayload::into_recommendation)
            .collect())
    }
}

#[async_trait]
impl BookCatalog for HttpGateway {
    async fn list_genres(&self) -> Result<Vec<String>, GatewayError> {
        let (status, body) = Self::send(self.client.get(self.url("/api/genres"))).await?;
        Self::expect_success(status, &body)?;
        Self::decode(&body)
    }

    async fn books_by_genre(&self, genre: &str) -> Result<Vec<Recommendation>, GatewayError> {
        let request = self.client.get(self.url("/api/books")).query(&[("genre", genre)]);
        let (status, body) = Self::send(request).await?;
        Self::expect_success(status, &body)?;

        let books: Vec<CatalogBook> = Self::decode(&body)?;
        Ok(books.into_iter().map(Recommendation::from).collect())
    }
}
