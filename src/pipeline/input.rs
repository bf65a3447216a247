//! Input resolution: normalise a user-supplied path or URL to an image
//! reference the API accepts.
//!
//! The REST endpoint cannot open files on the caller's disk, so a local path
//! is read, validated by magic bytes, and embedded as a base64 data URI.
//! HTTP(S) URLs pass through verbatim — the endpoint fetches those itself.
//! Validating the magic bytes up front turns "the model saw garbage" into a
//! meaningful error before any network traffic.

use crate::error::QuizScanError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to an image reference for the request payload.
///
/// URLs are returned unchanged; local paths are validated and encoded as
/// `data:<mime>;base64,<payload>` URIs.
pub fn resolve_image(input: &str) -> Result<String, QuizScanError> {
    if is_url(input) {
        debug!("Using remote image URL: {}", input);
        return Ok(input.to_string());
    }
    encode_local(Path::new(input))
}

/// Read a local image file and encode it as a base64 data URI.
fn encode_local(path: &Path) -> Result<String, QuizScanError> {
    if !path.exists() {
        return Err(QuizScanError::ImageNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = std::fs::read(path).map_err(|e| map_read_error(e, path))?;

    let mime = sniff_mime(&bytes).ok_or_else(|| {
        let mut magic = [0u8; 4];
        let n = bytes.len().min(4);
        magic[..n].copy_from_slice(&bytes[..n]);
        QuizScanError::UnsupportedImage {
            path: path.to_path_buf(),
            magic,
        }
    })?;

    let b64 = STANDARD.encode(&bytes);
    debug!(
        "Encoded local image {} ({} bytes → {} bytes base64, {})",
        path.display(),
        bytes.len(),
        b64.len(),
        mime
    );
    Ok(format!("data:{};base64,{}", mime, b64))
}

fn map_read_error(e: std::io::Error, path: &Path) -> QuizScanError {
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => QuizScanError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => QuizScanError::ImageNotFound {
            path: path.to_path_buf(),
        },
    }
}

/// Detect the image MIME type from magic bytes.
fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.len() < 4 {
        return None;
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        Some("image/png")
    } else if bytes.starts_with(b"RIFF") {
        Some("image/webp")
    } else if bytes.starts_with(b"BM") {
        Some("image/bmp")
    } else {
        None
    }
}
