//! Output types: the question envelope shared between the API boundary and
//! every consumer.
//!
//! [`AnalysisResult`] is the single contract of the crate. Its invariant —
//! exactly one of (`data` present, `status = Success`) or (`message` present,
//! `status = Error`) — is upheld by constructing values only through
//! [`AnalysisResult::success`] and [`AnalysisResult::error`]. Deserialized
//! values come straight from model output and are validated by consumers.

use serde::{Deserialize, Serialize};

/// Overall outcome of one analysis call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Classification of a parsed exam question.
///
/// The wire labels are the Chinese ones the vision model emits; snake_case
/// English aliases are accepted on input for callers that post-process the
/// JSON themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    /// 选择题 — has lettered options to pick from.
    #[serde(rename = "选择题", alias = "multiple_choice")]
    MultipleChoice,
    /// 填空题 — blanks to fill in, no options.
    #[serde(rename = "填空题", alias = "fill_blank")]
    FillBlank,
    /// 解答题 — free-form working or essay answer.
    #[serde(rename = "解答题", alias = "free_response", alias = "问答题")]
    FreeResponse,
}

impl QuestionKind {
    /// Human-readable label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "选择题",
            QuestionKind::FillBlank => "填空题",
            QuestionKind::FreeResponse => "解答题",
        }
    }
}

/// One question parsed out of the image. Never mutated after parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// Full question text, numbering stripped.
    pub text: String,
    /// Cleaned options in original order; empty for non-choice questions.
    #[serde(default)]
    pub options: Vec<String>,
}

/// The `data` payload of a successful analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSet {
    // The model emits both "questions" and "question" depending on the run.
    #[serde(alias = "question")]
    pub questions: Vec<Question>,
}

/// The question envelope: outcome of normalising one model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<QuestionSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AnalysisResult {
    /// Build a success envelope carrying the parsed questions.
    pub fn success(data: QuestionSet) -> Self {
        Self {
            status: Status::Success,
            data: Some(data),
            message: None,
        }
    }

    /// Build an error envelope carrying a diagnostic message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Questions in the envelope, or an empty slice for error envelopes.
    pub fn questions(&self) -> &[Question] {
        self.data.as_ref().map(|d| d.questions.as_slice()).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_chinese_kind_labels() {
        let q: Question =
            serde_json::from_str(r#"{"type":"选择题","text":"Q1","options":["A","B"]}"#).unwrap();
        assert_eq!(q.kind, QuestionKind::MultipleChoice);
        assert_eq!(q.options.len(), 2);
    }

    #[test]
    fn deserialize_snake_case_alias() {
        let q: Question = serde_json::from_str(r#"{"type":"fill_blank","text":"__"}"#).unwrap();
        assert_eq!(q.kind, QuestionKind::FillBlank);
        assert!(q.options.is_empty(), "options default to empty");
    }

    #[test]
    fn question_set_accepts_singular_key() {
        let set: QuestionSet = serde_json::from_str(
            r#"{"question":[{"type":"解答题","text":"证明……"}]}"#,
        )
        .unwrap();
        assert_eq!(set.questions.len(), 1);
    }

    #[test]
    fn success_envelope_invariant() {
        let r = AnalysisResult::success(QuestionSet { questions: vec![] });
        assert!(r.is_success());
        assert!(r.data.is_some() && r.message.is_none());
    }

    #[test]
    fn error_envelope_invariant() {
        let r = AnalysisResult::error("boom");
        assert!(!r.is_success());
        assert!(r.data.is_none() && r.message.as_deref() == Some("boom"));
    }

    #[test]
    fn serialize_omits_absent_fields() {
        let json = serde_json::to_string(&AnalysisResult::error("x")).unwrap();
        assert!(!json.contains("data"));
        let json = serde_json::to_string(&AnalysisResult::success(QuestionSet {
            questions: vec![],
        }))
        .unwrap();
        assert!(!json.contains("message"));
    }
}
