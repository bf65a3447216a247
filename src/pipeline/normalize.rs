//! Response normalisation: best-effort recovery of one JSON envelope from
//! noisy model text.
//!
//! Vision models routinely disobey "output only JSON": they wrap the payload
//! in ```` ```json ```` fences or pad it with prose. This module applies two
//! cheap recovery steps — fence stripping, then first-`{`-to-last-`}` span
//! extraction — before parsing. The contract is narrow on purpose: recover
//! *one* JSON object from noisy text, nothing more. It is not a parser and
//! must not grow into one.
//!
//! Every failure mode (no JSON present, invalid JSON, wrong shape) is
//! converted into the error envelope. [`normalize`] never panics and never
//! returns an `Err`.
//!
//! Known limitation: the span heuristic takes the *last* `}` in the text, so
//! prose containing a stray closing brace after the real object corrupts the
//! candidate. Kept as-is for behavioural parity with the original tooling;
//! see `stray_brace_after_object_corrupts_extraction` below.

use crate::output::AnalysisResult;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static RE_JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:json)?\s*\n?(.*?)\n?\s*```\s*$").unwrap());

/// Strip a surrounding Markdown code fence (```` ```json … ``` ````), if any,
/// and trim whitespace.
pub fn strip_json_fence(input: &str) -> String {
    let trimmed = input.trim();
    if let Some(caps) = RE_JSON_FENCE.captures(trimmed) {
        caps[1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Extract the first `{…}` span, greedy to the last `}`.
pub fn extract_object(input: &str) -> Option<&str> {
    let start = input.find('{')?;
    let end = input.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&input[start..=end])
}

/// Normalise raw model text into the question envelope.
///
/// Steps:
/// 1. Strip a Markdown JSON fence if present
/// 2. If the remainder does not start with `{`, fall back to span extraction
/// 3. Parse as JSON into [`AnalysisResult`]
/// 4. Map any failure to the error envelope with a diagnostic that includes
///    the cleaned text
pub fn normalize(raw: &str) -> AnalysisResult {
    let cleaned = strip_json_fence(raw);

    let candidate = if cleaned.starts_with('{') {
        cleaned.as_str()
    } else {
        match extract_object(&cleaned) {
            Some(span) => span,
            None => {
                debug!("No JSON object found in model output");
                return AnalysisResult::error(format!(
                    "模型输出中未找到 JSON 对象，原始内容: {cleaned}"
                ));
            }
        }
    };

    match serde_json::from_str::<AnalysisResult>(candidate) {
        Ok(result) => result,
        Err(e) => {
            debug!("JSON parse failed: {}", e);
            AnalysisResult::error(format!("JSON 解析失败: {e}，清理后内容: {candidate}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{QuestionKind, Status};

    const SAMPLE: &str = r#"{"status":"success","data":{"question":[{"type":"选择题","text":"Q1","options":["A","B"]}]}}"#;

    #[test]
    fn fence_with_language_tag() {
        let input = format!("```json\n{SAMPLE}\n```");
        assert_eq!(strip_json_fence(&input), SAMPLE);
    }

    #[test]
    fn fence_without_language_tag() {
        let input = format!("```\n{SAMPLE}\n```");
        assert_eq!(strip_json_fence(&input), SAMPLE);
    }

    #[test]
    fn unfenced_text_trimmed_only() {
        assert_eq!(strip_json_fence("  {\"a\":1}  \n"), "{\"a\":1}");
    }

    #[test]
    fn extract_object_from_prose() {
        let input = "好的，解析结果如下：{\"status\":\"error\",\"message\":\"x\"} 请查收。";
        assert_eq!(
            extract_object(input).unwrap(),
            "{\"status\":\"error\",\"message\":\"x\"}"
        );
    }

    #[test]
    fn extract_object_none_without_braces() {
        assert!(extract_object("no json here").is_none());
        assert!(extract_object("} backwards {").is_none());
    }

    #[test]
    fn normalize_fenced_sample() {
        let input = format!("```json\n{SAMPLE}\n```");
        let result = normalize(&input);
        assert_eq!(result.status, Status::Success);
        let questions = result.questions();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].kind, QuestionKind::MultipleChoice);
        assert_eq!(questions[0].options, vec!["A", "B"]);
    }

    #[test]
    fn normalize_object_embedded_in_prose() {
        let input = format!("解析完成。{SAMPLE}");
        let result = normalize(&input);
        assert!(result.is_success());
        assert_eq!(result.questions().len(), 1);
    }

    #[test]
    fn invalid_json_becomes_error_envelope() {
        // Unquoted key: syntactically invalid.
        let result = normalize("{status: success}");
        assert_eq!(result.status, Status::Error);
        let msg = result.message.unwrap();
        assert!(msg.contains("JSON 解析失败"), "got: {msg}");
    }

    #[test]
    fn empty_input_becomes_error_envelope() {
        let result = normalize("");
        assert_eq!(result.status, Status::Error);
        assert!(result.message.unwrap().contains("未找到 JSON 对象"));
    }

    #[test]
    fn prose_without_json_becomes_error_envelope() {
        let result = normalize("图片中没有题目。");
        assert_eq!(result.status, Status::Error);
    }

    // Documents the inherited first-{-to-last-} heuristic: a stray closing
    // brace in trailing prose widens the span and breaks the parse.
    #[test]
    fn stray_brace_after_object_corrupts_extraction() {
        let input = "结果 {\"status\":\"error\",\"message\":\"x\"} 注：} 为右花括号";
        let result = normalize(input);
        assert_eq!(result.status, Status::Error);
        assert!(result.message.unwrap().contains("JSON 解析失败"));
    }
}
