//! Turns the summarizer's text output into a structured result.
//!
//! The collaborator prints free-form log text, then a summary marker line
//! followed by a JSON object, then a sources marker line followed by one URL
//! per line. Markers are matched by substring so decorated marker lines
//! still count; the first occurrence of each wins.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::data_models::{ExtractedResult, RawExecutionResult};
use crate::error::SearchError;

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+").expect("URL pattern is valid"));

/// Literal marker substrings of the summarizer's text protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    pub summary: String,
    pub sources: String,
}

impl Default for Markers {
    fn default() -> Self {
        Markers {
            summary: "--- Resumo ---".to_string(),
            sources: "Fontes utilizadas:".to_string(),
        }
    }
}

pub fn extract(
    raw: &RawExecutionResult,
    markers: &Markers,
) -> Result<ExtractedResult, SearchError> {
    if !raw.succeeded() {
        return Err(SearchError::BackendFailure {
            exit_code: raw.exit_code,
            stderr: raw.stderr.clone(),
        });
    }

    let lines: Vec<&str> = raw.stdout.split('\n').collect();
    let summary_idx = lines.iter().position(|line| line.contains(&markers.summary));
    let sources_idx = lines.iter().position(|line| line.contains(&markers.sources));

    let body = summary_body(&lines, summary_idx, sources_idx);
    let structured = match parse_structured(&body) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!("{}", e);
            None
        }
    };

    let mut sources = listed_sources(&lines, sources_idx);
    if sources.is_empty() {
        sources = stderr_sources(&raw.stderr);
        if !sources.is_empty() {
            tracing::debug!(count = sources.len(), "using sources found in stderr");
        }
    }

    Ok(ExtractedResult {
        structured,
        sources,
        raw_output: raw.stdout.clone(),
    })
}

/// Text strictly between the summary marker and the sources marker (or the
/// end of output), trimmed. Empty when there is no summary marker.
pub fn summary_body(
    lines: &[&str],
    summary_idx: Option<usize>,
    sources_idx: Option<usize>,
) -> String {
    let Some(summary_idx) = summary_idx else {
        return String::new();
    };
    let start = summary_idx + 1;
    let end = sources_idx.unwrap_or(lines.len());
    if end <= start {
        return String::new();
    }
    lines[start..end].join("\n").trim().to_string()
}

/// `Ok(None)` for an empty body; `ParseAmbiguity` when the body is present but
/// is not a JSON object.
pub fn parse_structured(body: &str) -> Result<Option<Map<String, Value>>, SearchError> {
    let body = strip_code_fence(body);
    if body.is_empty() {
        return Ok(None);
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(record)) => Ok(Some(record)),
        Ok(other) => Err(SearchError::ParseAmbiguity(format!(
            "expected a JSON object, got {}",
            kind_of(&other)
        ))),
        Err(e) => Err(SearchError::ParseAmbiguity(e.to_string())),
    }
}

fn strip_code_fence(body: &str) -> &str {
    let body = body.trim();
    let Some(rest) = body.strip_prefix("```") else {
        return body;
    };
    let Some(rest) = rest.strip_suffix("```") else {
        return body;
    };
    // drop the info string (`json`) on the opening fence line
    match rest.split_once('\n') {
        Some((_, inner)) => inner.trim(),
        None => rest.trim(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn listed_sources(lines: &[&str], sources_idx: Option<usize>) -> Vec<String> {
    let Some(idx) = sources_idx else {
        return Vec::new();
    };
    lines[idx + 1..]
        .iter()
        .map(|line| line.trim())
        .filter(|line| line.starts_with("http://") || line.starts_with("https://"))
        .map(str::to_string)
        .collect()
}

/// Every whitespace-delimited `http(s)://` run in `stderr`, in order.
pub fn stderr_sources(stderr: &str) -> Vec<String> {
    URL_PATTERN
        .find_iter(stderr)
        .map(|m| m.as_str().to_string())
        .collect()
}
