//! `sitetext -u <url>` — extract a page's visible text and save it.

use crate::acquisition::fetcher::{Fetcher, HttpFetcher};
use crate::cli::output::{Mode, Reporter};
use crate::config::Config;
use crate::extraction::error::ExtractError;
use crate::extraction::extractor::Extractor;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

/// What a successful run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub address: String,
    pub output: String,
    pub bytes: usize,
    pub chars: usize,
    pub duration_ms: u128,
}

/// Run the extract command over HTTP.
pub fn run(config: &Config, reporter: &Reporter) -> Result<RunSummary> {
    let fetcher =
        HttpFetcher::new(config.timeout_ms, &config.user_agent).context("setting up HTTP client")?;
    run_with(config, Arc::new(fetcher), reporter)
}

/// Run the extract command with an arbitrary fetcher.
///
/// Nothing is written unless extraction succeeds.
pub fn run_with(
    config: &Config,
    fetcher: Arc<dyn Fetcher>,
    reporter: &Reporter,
) -> Result<RunSummary> {
    let start = Instant::now();
    reporter.reading(&config.address);

    let extractor = Extractor::new(fetcher, config.extract_options());
    let text = extractor.extract_text(&config.address)?;

    let summary = RunSummary {
        address: config.address.clone(),
        output: config.output_path.display().to_string(),
        bytes: text.len(),
        chars: text.chars().count(),
        duration_ms: start.elapsed().as_millis(),
    };

    // In JSON mode stdout is taken by the JSON document, so the text rides
    // inside it instead.
    if reporter.mode() == Mode::Json && config.writes_to_stdout() {
        reporter.json(&summary_json(&summary, Some(&text))?);
        return Ok(summary);
    }

    write_text(config, &text)?;

    if reporter.mode() == Mode::Json {
        reporter.json(&summary_json(&summary, None)?);
    } else {
        let target = if config.writes_to_stdout() {
            "stdout"
        } else {
            summary.output.as_str()
        };
        reporter.wrote(target, summary.bytes, start.elapsed());
    }

    Ok(summary)
}

/// Print a failed run the way the reporter's mode expects.
pub fn report_error(err: &anyhow::Error, reporter: &Reporter) {
    match reporter.mode() {
        Mode::Json => reporter.json(&error_json(err)),
        Mode::Human | Mode::Quiet => reporter.failed(&format!("{err:#}")),
    }
}

/// JSON document for a successful run. `text` is inlined when stdout is
/// the output.
pub fn summary_json(summary: &RunSummary, text: Option<&str>) -> Result<Value> {
    let mut value = serde_json::to_value(summary)?;
    if let Some(text) = text {
        value["text"] = Value::String(text.to_string());
    }
    Ok(value)
}

/// JSON document for a failed run. Failures outside extraction (such as
/// an unwritable output file) have kind `io` and no address.
pub fn error_json(err: &anyhow::Error) -> Value {
    let extract_err = err.downcast_ref::<ExtractError>();
    let kind = extract_err
        .and_then(|e| serde_json::to_value(e.kind()).ok())
        .unwrap_or_else(|| Value::String("io".to_string()));
    json!({
        "error": kind,
        "address": extract_err.map(ExtractError::address),
        "message": format!("{err:#}"),
    })
}

fn write_text(config: &Config, text: &str) -> Result<()> {
    if config.writes_to_stdout() {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()?;
        return Ok(());
    }

    std::fs::write(&config.output_path, text)
        .with_context(|| format!("failed to write {}", config.output_path.display()))
}
