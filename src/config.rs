//! Configuration for image analysis.
//!
//! All behaviour is controlled through [`AnalysisConfig`], built via its
//! [`AnalysisConfigBuilder`]. The API key is an explicit field resolved once
//! per call — there is no ambient global; `DASHSCOPE_API_KEY` is consulted
//! only as a fallback when no key was set on the config.

use crate::error::QuizScanError;
use crate::pipeline::llm::VisionTransport;
use std::fmt;
use std::sync::Arc;

/// Default DashScope multimodal-generation endpoint.
pub const DEFAULT_BASE_URL: &str =
    "https://dashscope.aliyuncs.com/api/v1/services/aigc/multimodal-generation/generation";

/// Default vision model identifier.
pub const DEFAULT_MODEL: &str = "qwen2.5-vl-7b-instruct";

/// Configuration for one or more analysis calls.
///
/// Built via [`AnalysisConfig::builder()`] or [`AnalysisConfig::default()`].
///
/// # Example
/// ```rust
/// use quizscan::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .model("qwen2.5-vl-7b-instruct")
///     .api_timeout_secs(30)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct AnalysisConfig {
    /// DashScope API key. If `None`, read from `DASHSCOPE_API_KEY` per call.
    pub api_key: Option<String>,

    /// Endpoint URL. Default: [`DEFAULT_BASE_URL`].
    pub base_url: String,

    /// Vision model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Per-call API timeout in seconds. Default: 60.
    ///
    /// The original tooling configured no timeout at all; a hung endpoint
    /// would block forever. A bounded call is strictly safer for a
    /// one-request-at-a-time client.
    pub api_timeout_secs: u64,

    /// Custom system prompt. If `None`, uses [`crate::prompts::DEFAULT_SYSTEM_PROMPT`].
    pub system_prompt: Option<String>,

    /// Custom user prompt. If `None`, uses [`crate::prompts::DEFAULT_USER_PROMPT`].
    pub user_prompt: Option<String>,

    /// Pre-constructed transport. Takes precedence over the built-in
    /// DashScope client; used by tests to inject a mock.
    pub transport: Option<Arc<dyn VisionTransport>>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_timeout_secs: 60,
            system_prompt: None,
            user_prompt: None,
            transport: None,
        }
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("system_prompt", &self.system_prompt.as_ref().map(|_| "<custom>"))
            .field("user_prompt", &self.user_prompt.as_ref().map(|_| "<custom>"))
            .field("transport", &self.transport.as_ref().map(|_| "<dyn VisionTransport>"))
            .finish()
    }
}

impl AnalysisConfig {
    /// Create a new builder for `AnalysisConfig`.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }

    /// Resolve the API key: explicit config field first, then the
    /// `DASHSCOPE_API_KEY` environment variable.
    ///
    /// Called before any network traffic; a missing key is a fatal
    /// configuration error.
    pub fn resolve_api_key(&self) -> Result<String, QuizScanError> {
        if let Some(ref key) = self.api_key {
            if !key.is_empty() {
                return Ok(key.clone());
            }
        }
        match std::env::var("DASHSCOPE_API_KEY") {
            Ok(key) if !key.is_empty() => Ok(key),
            _ => Err(QuizScanError::MissingApiKey),
        }
    }
}

/// Builder for [`AnalysisConfig`].
#[derive(Debug)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn user_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.user_prompt = Some(prompt.into());
        self
    }

    pub fn transport(mut self, transport: Arc<dyn VisionTransport>) -> Self {
        self.config.transport = Some(transport);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalysisConfig, QuizScanError> {
        let c = &self.config;
        if c.model.is_empty() {
            return Err(QuizScanError::InvalidConfig("Model must not be empty".into()));
        }
        if c.base_url.is_empty() {
            return Err(QuizScanError::InvalidConfig(
                "Base URL must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = AnalysisConfig::default();
        assert_eq!(c.model, DEFAULT_MODEL);
        assert_eq!(c.api_timeout_secs, 60);
        assert!(c.api_key.is_none());
    }

    #[test]
    fn builder_rejects_empty_model() {
        let err = AnalysisConfig::builder().model("").build().unwrap_err();
        assert!(matches!(err, QuizScanError::InvalidConfig(_)));
    }

    #[test]
    fn timeout_floor_is_one_second() {
        let c = AnalysisConfig::builder().api_timeout_secs(0).build().unwrap();
        assert_eq!(c.api_timeout_secs, 1);
    }

    #[test]
    fn explicit_key_wins_over_env() {
        let c = AnalysisConfig::builder().api_key("sk-test").build().unwrap();
        assert_eq!(c.resolve_api_key().unwrap(), "sk-test");
    }

    #[test]
    fn debug_redacts_api_key() {
        let c = AnalysisConfig::builder().api_key("sk-secret").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("sk-secret"));
        assert!(dbg.contains("<redacted>"));
    }
}
