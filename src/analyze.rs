//! Analysis entry points.
//!
//! Control flow is one straight line: resolve the transport, validate and
//! encode the image, build the two-message payload, make a single API call,
//! normalise the reply. Fatal errors ([`QuizScanError`]) can only occur
//! before the request leaves the process; once the call is in flight every
//! failure is folded into the error envelope.

use crate::config::AnalysisConfig;
use crate::error::QuizScanError;
use crate::output::AnalysisResult;
use crate::pipeline::llm::{DashScopeClient, VisionTransport};
use crate::pipeline::{input, normalize};
use crate::prompts::{DEFAULT_SYSTEM_PROMPT, DEFAULT_USER_PROMPT};
use crate::report::render_report;
use crate::request::build_request;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Analyse a single image and return the question envelope.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `image`  — Local image file path or HTTP/HTTPS URL
/// * `config` — Analysis configuration
///
/// # Errors
/// Returns `Err(QuizScanError)` only for faults detected before any network
/// call: a missing API key, a missing/unreadable/unsupported image file, or
/// a broken configuration. Transport and payload failures come back as
/// `Ok(AnalysisResult)` with `status = "error"`.
pub async fn analyze(
    image: impl AsRef<str>,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, QuizScanError> {
    let image = image.as_ref();
    let start = Instant::now();
    info!("Starting analysis: {}", image);

    // ── Step 1: Resolve transport (configuration errors surface here) ────
    let transport = resolve_transport(config)?;

    // ── Step 2: Resolve and encode the image ─────────────────────────────
    let image_ref = input::resolve_image(image)?;

    // ── Step 3: Build the request payload ────────────────────────────────
    let request = build_request(
        &config.model,
        &image_ref,
        config.system_prompt.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT),
        config.user_prompt.as_deref().unwrap_or(DEFAULT_USER_PROMPT),
    );

    // ── Step 4: Call the model, fold failures into the envelope ──────────
    let result = match transport.complete(&request).await {
        Ok(raw) => {
            debug!("Raw model output: {} chars", raw.len());
            normalize::normalize(&raw)
        }
        Err(e) => {
            warn!("Transport failed: {}", e);
            AnalysisResult::error(e.to_string())
        }
    };

    info!(
        "Analysis {} in {}ms: {} questions",
        if result.is_success() { "succeeded" } else { "failed" },
        start.elapsed().as_millis(),
        result.questions().len()
    );
    Ok(result)
}

/// Synchronous wrapper around [`analyze`].
///
/// Creates a temporary tokio runtime internally.
pub fn analyze_sync(
    image: impl AsRef<str>,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, QuizScanError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| QuizScanError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(analyze(image, config))
}

/// Analyse an image and write the Markdown report to `report_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial reports. The
/// report is written for both success and error envelopes — a failed parse
/// still produces a readable document saying so.
pub async fn analyze_to_report(
    image: impl AsRef<str>,
    report_path: impl AsRef<Path>,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, QuizScanError> {
    let image = image.as_ref();
    let path = report_path.as_ref();

    let result = analyze(image, config).await?;
    let markdown = render_report(&result, image);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| QuizScanError::ReportWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
    }

    let tmp_path = path.with_extension("md.tmp");
    tokio::fs::write(&tmp_path, &markdown)
        .await
        .map_err(|e| QuizScanError::ReportWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| QuizScanError::ReportWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    info!("Report written to {}", path.display());
    Ok(result)
}

/// Resolve the transport: a caller-supplied one wins, otherwise build the
/// DashScope client from the config (which requires the API key).
fn resolve_transport(config: &AnalysisConfig) -> Result<Arc<dyn VisionTransport>, QuizScanError> {
    if let Some(ref transport) = config.transport {
        return Ok(Arc::clone(transport));
    }
    let api_key = config.resolve_api_key()?;
    let client = DashScopeClient::new(api_key, &config.base_url, config.api_timeout_secs)?;
    Ok(Arc::new(client))
}
