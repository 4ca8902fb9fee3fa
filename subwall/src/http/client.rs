//! HTTP client abstraction for testability

use std::fmt;
use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Default User-Agent string for HTTP requests.
///
/// Reddit throttles aggressively when the default library agent is used.
pub const DEFAULT_USER_AGENT: &str = concat!(
    "subwall/",
    env!("CARGO_PKG_VERSION"),
    " (wallpaper chooser)"
);

/// Default timeout for a single request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur while talking to a remote host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    /// The request did not complete within the configured timeout
    #[error("request timed out")]
    Timeout,
    /// Connection, protocol or body read failure
    #[error("transport error: {0}")]
    Transport(String),
    /// The client could not be constructed
    #[error("failed to create HTTP client: {0}")]
    Client(String),
}

impl From<reqwest::Error> for HttpError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            HttpError::Timeout
        } else {
            HttpError::Transport(e.to_string())
        }
    }
}

/// Streamed response body.
pub type BodyStream = BoxStream<'static, Result<Bytes, HttpError>>;

/// Response head plus a body stream that has not been read yet.
///
/// Dropping the response without reading the body closes the connection.
pub struct HttpResponse {
    status: u16,
    content_type: Option<String>,
    content_length: Option<u64>,
    body: BodyStream,
}

impl HttpResponse {
    /// Build a response from its parts.
    pub fn new(
        status: u16,
        content_type: Option<String>,
        content_length: Option<u64>,
        body: BodyStream,
    ) -> Self {
        Self {
            status,
            content_type,
            content_length,
            body,
        }
    }

    /// Build a response whose body is already in memory.
    pub fn from_bytes(status: u16, content_type: Option<&str>, body: impl Into<Bytes>) -> Self {
        let body: Bytes = body.into();
        let length = body.len() as u64;
        Self::new(
            status,
            content_type.map(str::to_string),
            Some(length),
            futures::stream::once(async move { Ok(body) }).boxed(),
        )
    }

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// True for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Raw `content-type` header, if present.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Advisory `content-length` header, if present.
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Take the body stream, consuming the response.
    pub fn into_body(self) -> BodyStream {
        self.body
    }

    /// Read the whole body into memory.
    pub async fn bytes(self) -> Result<Vec<u8>, HttpError> {
        let mut data = Vec::new();
        let mut body = self.body;
        while let Some(chunk) = body.next().await {
            data.extend_from_slice(&chunk?);
        }
        Ok(data)
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Trait for asynchronous HTTP GET operations.
///
/// Both listing pages and image bodies are fetched through this trait, which
/// lets tests substitute an in-memory implementation.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP GET request.
    ///
    /// Non-success statuses are returned as responses, not errors; only
    /// transport failures and timeouts produce `Err`.
    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse, HttpError>> + Send;
}

/// Async HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new client with the default timeout.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Creates a new client with a custom total request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| HttpError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        trace!(url = url, "HTTP GET request starting");

        let response = match self.client.get(url).send().await {
            Ok(resp) => {
                debug!(
                    url = url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(HttpError::from(e));
            }
        };

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(HttpResponse::new(
            response.status().as_u16(),
            content_type,
            response.content_length(),
            response.bytes_stream().map_err(HttpError::from).boxed(),
        ))
    }
}
