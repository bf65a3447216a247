//! CLI binary for quizscan.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `AnalysisConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use quizscan::{analyze, analyze_to_report, AnalysisConfig};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Analyse an image, print the parsed questions as JSON
  quizscan exam.jpg

  # Also write a Markdown report
  quizscan exam.jpg --report
  quizscan exam.jpg --report notes/exam.md

  # Analyse a remote image
  quizscan https://example.com/paper.png

  # Use a different model with a tighter timeout
  quizscan --model qwen-vl-max --api-timeout 30 exam.jpg

ENVIRONMENT VARIABLES:
  DASHSCOPE_API_KEY   DashScope API key (also read from a .env file)

SETUP:
  1. Set API key:  export DASHSCOPE_API_KEY=sk-...
  2. Analyse:      quizscan exam.jpg --report
"#;

/// Parse exam questions from an image using a Vision LLM.
#[derive(Parser, Debug)]
#[command(
    name = "quizscan",
    version,
    about = "Parse exam questions from images using Vision LLMs",
    long_about = "Send an exam/quiz image (local file or URL) to a multimodal LLM, parse the \
questions it finds into structured JSON, and optionally render a Markdown report.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local image file path or HTTP/HTTPS URL.
    input: String,

    /// Write a Markdown report (default path: analysis_result.md).
    #[arg(
        long,
        env = "QUIZSCAN_REPORT",
        num_args = 0..=1,
        default_missing_value = "analysis_result.md"
    )]
    report: Option<PathBuf>,

    /// Vision LLM model ID.
    #[arg(long, env = "QUIZSCAN_MODEL")]
    model: Option<String>,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "QUIZSCAN_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Per-call API timeout in seconds.
    #[arg(long, env = "QUIZSCAN_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "QUIZSCAN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the result itself.
    #[arg(short, long, env = "QUIZSCAN_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up DASHSCOPE_API_KEY from a local .env file if present.
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli).await?;

    // ── Run analysis ─────────────────────────────────────────────────────
    let result = if let Some(ref report_path) = cli.report {
        let result = analyze_to_report(&cli.input, report_path, &config)
            .await
            .context("Analysis failed")?;
        if !cli.quiet {
            eprintln!("Report written to {}", report_path.display());
        }
        result
    } else {
        analyze(&cli.input, &config).await.context("Analysis failed")?
    };

    // An error envelope is still a completed run: print it and exit 0 so
    // callers can distinguish "could not run" (non-zero, above) from
    // "ran, model output unusable" (envelope on stdout).
    let json = serde_json::to_string_pretty(&result).context("Failed to serialise result")?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(json.as_bytes())
        .and_then(|_| handle.write_all(b"\n"))
        .context("Failed to write to stdout")?;

    Ok(())
}

/// Map CLI args to `AnalysisConfig`.
async fn build_config(cli: &Cli) -> Result<AnalysisConfig> {
    let mut builder = AnalysisConfig::builder().api_timeout_secs(cli.api_timeout);

    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }

    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {path:?}"))?;
        builder = builder.system_prompt(prompt);
    }

    builder.build().context("Invalid configuration")
}
