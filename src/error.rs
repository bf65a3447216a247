//! Error types for the quizscan library.
//!
//! Only *fatal* conditions surface as [`QuizScanError`] — a missing API key,
//! a missing or unreadable image, a bad configuration. Everything that goes
//! wrong *after* the request leaves the process (transport failures, a
//! malformed API response, model output that is not valid JSON) is recovered
//! into the [`crate::output::AnalysisResult`] error envelope instead, so the
//! caller of [`crate::analyze`] always gets either a hard `Err` before any
//! network traffic or a fully-formed envelope afterwards.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the quizscan library.
///
/// Response-level failures use the `status = "error"` envelope in
/// [`crate::output::AnalysisResult`] rather than this type.
#[derive(Debug, Error)]
pub enum QuizScanError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// No API key on the config and `DASHSCOPE_API_KEY` is unset or empty.
    #[error(
        "DASHSCOPE_API_KEY is not set.\nExport it or add it to a .env file:\n  export DASHSCOPE_API_KEY=sk-..."
    )]
    MissingApiKey,

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// Image file was not found at the given path.
    #[error("Image file not found: '{path}'\nCheck the path exists and is readable.")]
    ImageNotFound { path: PathBuf },

    /// Process does not have read permission on the image file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a supported image format.
    #[error("File is not a supported image (JPEG/PNG/WEBP/BMP): '{path}'\nFirst bytes: {magic:?}")]
    UnsupportedImage { path: PathBuf, magic: [u8; 4] },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the Markdown report file.
    #[error("Failed to write report file '{path}': {source}")]
    ReportWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_not_found_display() {
        let e = QuizScanError::ImageNotFound {
            path: PathBuf::from("missing.jpg"),
        };
        let msg = e.to_string();
        assert!(msg.contains("missing.jpg"), "got: {msg}");
    }

    #[test]
    fn missing_api_key_display_mentions_variable() {
        let e = QuizScanError::MissingApiKey;
        assert!(e.to_string().contains("DASHSCOPE_API_KEY"));
    }

    #[test]
    fn unsupported_image_display() {
        let e = QuizScanError::UnsupportedImage {
            path: PathBuf::from("notes.txt"),
            magic: *b"Hell",
        };
        assert!(e.to_string().contains("notes.txt"));
    }
}
