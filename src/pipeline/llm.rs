//! The transport seam: one synchronous call to the multimodal conversation
//! endpoint, returning the raw text the model generated.
//!
//! [`VisionTransport`] is the only trait in the crate and exists for exactly
//! one reason: tests must be able to substitute the network call and observe
//! whether it happened at all (input validation is required to short-circuit
//! before any request is made). The production implementation is
//! [`DashScopeClient`], a thin `reqwest` wrapper.
//!
//! Transport failures are deliberately *not* [`crate::error::QuizScanError`]:
//! everything past the request boundary is recovered into the error envelope
//! by the caller, so this module reports failures with its own
//! [`TransportError`].

use crate::error::QuizScanError;
use crate::request::ChatRequest;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Failure of a single transport call. Converted to the error envelope by
/// [`crate::analyze`]; never propagated as a hard error.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The response arrived but lacked the expected nested fields
    /// (`output → choices[0] → message → content[0] → text`), or was empty.
    #[error("API 返回为空或格式错误")]
    MalformedResponse,

    /// The request could not be sent or the response body not read.
    #[error("API 请求失败: {0}")]
    Request(String),

    /// The endpoint answered with a non-success HTTP status.
    #[error("API 返回错误状态 {status}: {body}")]
    Status { status: u16, body: String },
}

/// A client capable of one multimodal completion call.
#[async_trait]
pub trait VisionTransport: Send + Sync {
    /// Send the request and return the raw text content of the model reply.
    async fn complete(&self, request: &ChatRequest) -> Result<String, TransportError>;
}

// ── Wire format of the DashScope response ────────────────────────────────

/// Expected shape: `{ output: { choices: [ { message: { content: [ { text } ] } } ] } }`.
/// Every level is optional so a malformed response degrades to
/// [`TransportError::MalformedResponse`] instead of a deserialisation error.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    output: Option<ChatOutput>,
}

#[derive(Debug, Deserialize)]
struct ChatOutput {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Vec<ContentText>,
}

#[derive(Debug, Deserialize)]
struct ContentText {
    text: Option<String>,
}

impl ChatResponse {
    /// Walk the nested structure down to the first text part.
    fn into_text(self) -> Option<String> {
        self.output?
            .choices
            .into_iter()
            .next()?
            .message?
            .content
            .into_iter()
            .next()?
            .text
    }
}

// ── Production client ────────────────────────────────────────────────────

/// `reqwest`-backed DashScope client.
pub struct DashScopeClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl DashScopeClient {
    /// Build a client with a bounded per-call timeout.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, QuizScanError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| QuizScanError::Internal(format!("HTTP client build failed: {e}")))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl VisionTransport for DashScopeClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, TransportError> {
        debug!("Calling {} with model {}", self.base_url, request.model);

        let response = self
            .http
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        if !status.is_success() {
            warn!("API returned HTTP {}: {}", status, body);
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|_| TransportError::MalformedResponse)?;

        let text = parsed.into_text().ok_or(TransportError::MalformedResponse)?;
        debug!("Model replied with {} chars", text.len());
        Ok(text)
    }
}
