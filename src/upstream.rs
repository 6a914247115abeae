//! Client for the upstream agent API.
//!
//! All calls carry the caller's bearer token and go through the
//! [`HttpClient`] seam.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::UpstreamError;
use crate::models::{ChatMessage, ConversationSummary, ConversationsResponse, UpstreamChatRequest};
use crate::traits::{ByteStream, Headers, HttpClient, Response};

pub const DEFAULT_UPSTREAM_URL: &str = "http://localhost:8000";

static BEARER_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Bearer\s+").expect("Invalid bearer regex"));

/// Format a stored token as an `Authorization` header value.
///
/// Cookies sometimes already hold `Bearer <token>`; the prefix is never
/// doubled.
pub fn bearer_header(token: &str) -> String {
    let token = token.trim();
    format!("Bearer {}", BEARER_PREFIX.replace(token, ""))
}

/// Client for the upstream agent API.
#[derive(Clone)]
pub struct UpstreamClient {
    /// Base URL, without trailing slash
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl UpstreamClient {
    pub fn new(base_url: impl Into<String>, http: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn auth_headers(token: &str) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Authorization".to_string(), bearer_header(token));
        headers
    }

    fn check(response: Response) -> Result<Response, UpstreamError> {
        if response.is_success() {
            Ok(response)
        } else {
            Err(UpstreamError::from_status(response.status, &response.text()))
        }
    }

    /// Send one chat turn and return the raw SSE body.
    ///
    /// Sends a POST request to `/chat`. The body is not read here; it is
    /// handed to the relay, which decodes it as it arrives.
    pub async fn send_message(
        &self,
        token: &str,
        request: &UpstreamChatRequest,
    ) -> Result<ByteStream, UpstreamError> {
        let url = format!("{}/chat", self.base_url);
        let body = serde_json::to_string(request)?;

        let mut headers = Self::auth_headers(token);
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "text/event-stream".to_string());

        tracing::debug!(url = %url, conversation_id = ?request.conversation_id, "Opening upstream stream");
        let stream = self.http.post_stream(&url, &body, &headers).await?;
        Ok(stream)
    }

    /// List the caller's conversations.
    pub async fn list_conversations(
        &self,
        token: &str,
    ) -> Result<Vec<ConversationSummary>, UpstreamError> {
        let url = format!("{}/conversations", self.base_url);
        let response = Self::check(self.http.get(&url, &Self::auth_headers(token)).await?)?;
        let parsed: ConversationsResponse = response.json()?;
        Ok(parsed.into_conversations())
    }

    /// Fetch the stored messages of one conversation.
    ///
    /// A `null` body means the conversation does not exist.
    pub async fn conversation_history(
        &self,
        token: &str,
        conversation_id: &str,
    ) -> Result<Vec<ChatMessage>, UpstreamError> {
        let url = format!("{}/chat/{}/history", self.base_url, conversation_id);
        let response = Self::check(self.http.get(&url, &Self::auth_headers(token)).await?)?;
        let messages: Option<Vec<ChatMessage>> = response.json()?;
        messages.ok_or(UpstreamError::NotFound)
    }

    /// Delete one conversation.
    pub async fn delete_conversation(
        &self,
        token: &str,
        conversation_id: &str,
    ) -> Result<(), UpstreamError> {
        let url = format!("{}/conversations/{}", self.base_url, conversation_id);
        Self::check(self.http.delete(&url, &Self::auth_headers(token)).await?)?;
        Ok(())
    }
}
