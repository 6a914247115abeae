//! Mock HTTP client for testing.
//!
//! Responses are registered per method and URL. Streaming responses are
//! scripted as a list of chunks, optionally followed by a connection that
//! stays open forever.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub headers: Headers,
    pub body: Option<String>,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Buffered response with any status
    Buffered(Response),
    /// Request fails before a response arrives
    Error(HttpError),
    /// Streamed body, ending after the last item
    Stream(Vec<Result<Bytes, HttpError>>),
    /// Streamed body that never ends after the last item
    StreamThenHang(Vec<Bytes>),
}

impl MockResponse {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        MockResponse::Buffered(Response::new(status, body.to_string()))
    }

    pub fn status(status: u16) -> Self {
        MockResponse::Buffered(Response::new(status, Bytes::new()))
    }

    /// Streamed body from whole lines, one chunk per line.
    pub fn sse_lines(lines: &[&str]) -> Self {
        MockResponse::Stream(
            lines
                .iter()
                .map(|line| Ok(Bytes::from(format!("{}\n", line))))
                .collect(),
        )
    }
}

/// Mock HTTP client for testing.
///
/// ```ignore
/// let client = MockHttpClient::new();
/// client.set_response("GET", "http://up/conversations", MockResponse::json(200, json!([])));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<(String, String), MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a response for an exact method and URL.
    pub fn set_response(&self, method: &str, url: &str, response: MockResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), url.to_string()), response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, method: &str, url: &str, headers: &Headers, body: Option<&str>) {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body: body.map(String::from),
        });
    }

    fn lookup(&self, method: &str, url: &str) -> Result<MockResponse, HttpError> {
        self.responses
            .lock()
            .unwrap()
            .get(&(method.to_string(), url.to_string()))
            .cloned()
            .ok_or_else(|| HttpError::Other(format!("No mock response for {} {}", method, url)))
    }

    fn buffered(&self, method: &str, url: &str) -> Result<Response, HttpError> {
        match self.lookup(method, url)? {
            MockResponse::Buffered(response) => Ok(response),
            MockResponse::Error(err) => Err(err),
            _ => Err(HttpError::Other(
                "Stream response on non-stream request".to_string(),
            )),
        }
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record("GET", url, headers, None);
        self.buffered("GET", url)
    }

    async fn delete(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record("DELETE", url, headers, None);
        self.buffered("DELETE", url)
    }

    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        self.record("POST", url, headers, Some(body));

        match self.lookup("POST", url)? {
            MockResponse::Stream(items) => Ok(Box::pin(stream::iter(items))),
            MockResponse::StreamThenHang(chunks) => Ok(Box::pin(
                stream::iter(chunks.into_iter().map(Ok::<Bytes, HttpError>))
                    .chain(stream::pending()),
            )),
            MockResponse::Buffered(response) if response.is_success() => Err(HttpError::Other(
                "Non-stream response on stream request".to_string(),
            )),
            MockResponse::Buffered(response) => Err(HttpError::ServerError {
                status: response.status,
                message: response.text(),
            }),
            MockResponse::Error(err) => Err(err),
        }
    }
}
