//! # quizscan
//!
//! Parse exam and quiz questions out of images using a Vision Language Model.
//!
//! ## Why this crate?
//!
//! Conventional OCR turns an exam sheet into a flat wall of text — question
//! boundaries, option lists, and blank positions are lost. Instead this crate
//! hands the image to a vision model with a strict parsing prompt and gets
//! back structured questions: type, text, and cleaned options.
//!
//! ## Pipeline Overview
//!
//! ```text
//! image path / URL
//!  │
//!  ├─ 1. Input      validate the file, encode as a base64 data URI
//!  ├─ 2. Prompt     fixed system rules + output-shape instructions
//!  ├─ 3. API        one call to the multimodal conversation endpoint
//!  ├─ 4. Normalise  strip fences, extract JSON, parse the envelope
//!  └─ 5. Output     pretty-printed JSON or a Markdown report
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quizscan::{analyze, AnalysisConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // API key read from DASHSCOPE_API_KEY
//!     let config = AnalysisConfig::default();
//!     let result = analyze("exam.jpg", &config).await?;
//!     for question in result.questions() {
//!         println!("[{}] {}", question.kind.label(), question.text);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error model
//!
//! [`analyze`] returns `Err` only for faults that occur *before* the network
//! call (missing API key, missing image file). Everything after — transport
//! failures, a malformed API response, model output that is not valid JSON —
//! comes back as an [`AnalysisResult`] with `status = "error"` and a
//! diagnostic message, so one bad model reply never aborts a batch caller.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `quizscan` binary (clap + anyhow + tracing-subscriber + dotenv) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! quizscan = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod request;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{analyze, analyze_sync, analyze_to_report};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::QuizScanError;
pub use output::{AnalysisResult, Question, QuestionKind, QuestionSet, Status};
pub use pipeline::llm::{DashScopeClient, TransportError, VisionTransport};
pub use report::render_report;
pub use request::{build_request, ChatRequest};
