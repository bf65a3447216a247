//! Integration tests for the analysis entry points, using a mock transport.
//!
//! No network traffic happens here: `MockTransport` records every call and
//! returns a canned reply, which also lets us assert that input validation
//! short-circuits *before* the transport is touched.

use async_trait::async_trait;
use quizscan::{
    analyze, analyze_to_report, AnalysisConfig, ChatRequest, QuestionKind, QuizScanError, Status,
    TransportError, VisionTransport,
};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ── Test helpers ─────────────────────────────────────────────────────────

/// Canned-reply transport that counts how often it is called.
struct MockTransport {
    reply: Result<String, TransportError>,
    calls: AtomicUsize,
}

impl MockTransport {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(err: TransportError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(err),
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionTransport for MockTransport {
    async fn complete(&self, _request: &ChatRequest) -> Result<String, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }
}

fn config_with(transport: Arc<MockTransport>) -> AnalysisConfig {
    AnalysisConfig::builder()
        .transport(transport)
        .build()
        .expect("config builds")
}

/// Write a minimal JPEG-magic file and return its tempfile handle.
fn sample_jpeg() -> tempfile::NamedTempFile {
    let mut f = tempfile::Builder::new()
        .prefix("sample")
        .suffix(".jpg")
        .tempfile()
        .expect("tempfile");
    f.write_all(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46])
        .expect("write magic");
    f
}

const FENCED_REPLY: &str = "```json\n{\"status\":\"success\",\"data\":{\"question\":[{\"type\":\"选择题\",\"text\":\"Q1\",\"options\":[\"A\",\"B\"]}]}}\n```";

// ── End-to-end with mock transport ───────────────────────────────────────

#[tokio::test]
async fn fenced_reply_parses_to_one_question() {
    let transport = MockTransport::replying(FENCED_REPLY);
    let config = config_with(Arc::clone(&transport));
    let image = sample_jpeg();

    let result = analyze(image.path().to_str().unwrap(), &config)
        .await
        .expect("no fatal error");

    assert_eq!(result.status, Status::Success);
    assert_eq!(transport.call_count(), 1);
    let questions = result.questions();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].kind, QuestionKind::MultipleChoice);
    assert_eq!(questions[0].text, "Q1");
    assert_eq!(questions[0].options, vec!["A", "B"]);
}

#[tokio::test]
async fn missing_image_short_circuits_before_transport() {
    let transport = MockTransport::replying(FENCED_REPLY);
    let config = config_with(Arc::clone(&transport));

    let err = analyze("/definitely/not/here/sample.jpg", &config)
        .await
        .expect_err("must be a fatal input error");

    assert!(matches!(err, QuizScanError::ImageNotFound { .. }));
    assert_eq!(transport.call_count(), 0, "no network call may be attempted");
}

#[tokio::test]
async fn transport_failure_becomes_error_envelope() {
    let transport = MockTransport::failing(TransportError::MalformedResponse);
    let config = config_with(Arc::clone(&transport));
    let image = sample_jpeg();

    let result = analyze(image.path().to_str().unwrap(), &config)
        .await
        .expect("transport failures are not fatal");

    assert_eq!(result.status, Status::Error);
    assert_eq!(result.message.as_deref(), Some("API 返回为空或格式错误"));
}

#[tokio::test]
async fn garbage_model_output_becomes_error_envelope() {
    let transport = MockTransport::replying("这张图片里没有题目哦！");
    let config = config_with(transport);
    let image = sample_jpeg();

    let result = analyze(image.path().to_str().unwrap(), &config)
        .await
        .expect("payload failures are not fatal");

    assert_eq!(result.status, Status::Error);
    assert!(result.message.is_some());
}

#[tokio::test]
async fn missing_api_key_without_transport_is_fatal() {
    // No transport injected and no key on the config; make sure the env
    // fallback does not accidentally provide one.
    let config = AnalysisConfig::builder()
        .api_key("")
        .build()
        .expect("config builds");
    if std::env::var("DASHSCOPE_API_KEY").is_ok() {
        println!("SKIP — DASHSCOPE_API_KEY is set in this environment");
        return;
    }
    let image = sample_jpeg();

    let err = analyze(image.path().to_str().unwrap(), &config)
        .await
        .expect_err("missing key must be fatal");
    assert!(matches!(err, QuizScanError::MissingApiKey));
}

// ── Report writing ───────────────────────────────────────────────────────

#[tokio::test]
async fn report_written_with_question_sections() {
    let transport = MockTransport::replying(FENCED_REPLY);
    let config = config_with(transport);
    let image = sample_jpeg();

    let dir = tempfile::tempdir().expect("tempdir");
    let report_path = dir.path().join("analysis_result.md");

    let result = analyze_to_report(image.path().to_str().unwrap(), &report_path, &config)
        .await
        .expect("analysis succeeds");
    assert!(result.is_success());

    let md = std::fs::read_to_string(&report_path).expect("report exists");
    assert!(md.contains("# 图片题目解析报告"));
    assert!(md.contains("### 问题 1"));
    assert!(md.contains("A. A"));
    assert!(md.contains("B. B"));
    assert!(
        !report_path.with_extension("md.tmp").exists(),
        "temp file must be renamed away"
    );
}

#[tokio::test]
async fn report_written_for_error_envelope_too() {
    let transport = MockTransport::failing(TransportError::Request("connection refused".into()));
    let config = config_with(transport);
    let image = sample_jpeg();

    let dir = tempfile::tempdir().expect("tempdir");
    let report_path = dir.path().join("failed.md");

    let result = analyze_to_report(image.path().to_str().unwrap(), &report_path, &config)
        .await
        .expect("write still succeeds");
    assert_eq!(result.status, Status::Error);

    let md = std::fs::read_to_string(&report_path).expect("report exists");
    assert!(md.contains("| 解析状态 | 失败 |"));
    assert!(md.contains("connection refused"));
}
