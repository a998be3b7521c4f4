use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SearchError;

/// Returned for a missing, non-string, empty or whitespace-only query.
pub const INVALID_QUERY: &str = "Query parameter is required and must be a non-blank string";

/// Tuning knobs forwarded to the summarizer as command-line options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    pub max_results: u32,
    pub max_pages: u32,
    pub max_sentences: u32,
    pub no_groq: bool,
    pub verbose: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            max_results: 8,
            max_pages: 3,
            max_sentences: 5,
            no_groq: false,
            verbose: false,
        }
    }
}

/// A validated search. The query is guaranteed non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    query: String,
    options: SearchOptions,
}

impl SearchRequest {
    pub fn new(
        query: impl Into<String>,
        options: SearchOptions,
    ) -> Result<SearchRequest, SearchError> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(SearchError::InvalidInput(INVALID_QUERY.to_string()));
        }
        Ok(SearchRequest { query, options })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }
}

/// Everything the summarizer printed, captured after it exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawExecutionResult {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
}

impl RawExecutionResult {
    pub fn new(
        stdout: impl Into<String>,
        stderr: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        RawExecutionResult {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedResult {
    pub structured: Option<Map<String, Value>>,
    pub sources: Vec<String>,
    pub raw_output: String,
}
