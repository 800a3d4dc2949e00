//! DeenGPT service client (http://127.0.0.1:5000/chat by default).
//! One POST per chat turn; `GET /books` lists the hadith collections the service has loaded.

use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{self, Config};

/// Client for the DeenGPT HTTP API.
#[derive(Clone)]
pub struct ChatClient {
    endpoint: Url,
    client: reqwest::Client,
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service returned {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("unexpected reply: {0}")]
    Payload(String),
    #[error("invalid endpoint: {0}")]
    Config(String),
}

impl ChatClient {
    /// Build a client for the given chat URL. Only http and https endpoints are accepted.
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self, ChatError> {
        let endpoint = parse_endpoint(endpoint)?;
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Ok(Self {
            endpoint,
            client: builder.build()?,
        })
    }

    /// Client for the endpoint resolved from config and DEEN_ENDPOINT.
    pub fn from_config(config: &Config) -> Result<Self, ChatError> {
        let endpoint = config::resolve_endpoint(config);
        Self::new(&endpoint, config.client.timeout())
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POST the message as `{"message": ...}` and parse `{"response": ...}` from the reply.
    pub async fn chat(&self, message: &str) -> Result<ChatReply, ChatError> {
        log::debug!("POST {} ({} bytes)", self.endpoint, message.len());
        let res = self
            .client
            .post(self.endpoint.clone())
            .json(&ChatRequest { message })
            .send()
            .await?;
        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(ChatError::Status {
                status,
                message: error_message(&body),
            });
        }
        parse_reply(&body)
    }

    /// GET the `books` route next to the chat route — list loaded collections.
    /// A reply without a `books` array is a payload error, not an empty listing.
    pub async fn list_books(&self) -> Result<Vec<String>, ChatError> {
        let url = self.books_url()?;
        log::debug!("GET {}", url);
        let res = self.client.get(url).send().await?;
        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(ChatError::Status {
                status,
                message: error_message(&body),
            });
        }
        let data: BooksReply = serde_json::from_str(&body)
            .map_err(|e| ChatError::Payload(format!("books listing: {}", e)))?;
        Ok(data.books)
    }

    /// `books` resolved against the chat URL with any trailing `/` dropped, so `/chat/` and `/chat` both map to `/books`.
    fn books_url(&self) -> Result<Url, ChatError> {
        let mut base = self.endpoint.clone();
        let path = base.path().trim_end_matches('/').to_string();
        base.set_path(&path);
        base.join("books")
            .map_err(|e| ChatError::Config(e.to_string()))
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, ChatError> {
    let trimmed = endpoint.trim();
    let url = Url::parse(trimmed).map_err(|e| ChatError::Config(format!("{}: {}", trimmed, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ChatError::Config(format!(
            "{}: unsupported scheme {:?}",
            trimmed, other
        ))),
    }
}

/// Parse a chat reply body. Not-JSON and a missing or non-string `response` are both payload errors.
pub fn parse_reply(body: &str) -> Result<ChatReply, ChatError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ChatError::Payload(format!("body is not JSON: {}", e)))?;
    serde_json::from_value(value).map_err(|e| ChatError::Payload(e.to_string()))
}

/// Error text for a non-2xx reply: the service's own `response` text when present, else the raw body.
fn error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("response").and_then(|r| r.as_str()).map(str::to_string));
    match from_json {
        Some(m) => m,
        None if body.trim().is_empty() => "(empty body)".to_string(),
        None => body.trim().to_string(),
    }
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

#[derive(Debug, Deserialize)]
struct BooksReply {
    books: Vec<String>,
}
