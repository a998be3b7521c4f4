use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;

use crate::data_models::{RawExecutionResult, SearchRequest};
use crate::error::SearchError;

/// How to launch the external summarizer.
///
/// The query is always passed as its own argv element, never spliced into a
/// script or shell string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizerCommand {
    pub program: String,
    /// Arguments placed before the per-request options, e.g. `-m search_summarizer.cli`.
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub env: Vec<(String, String)>,
    /// `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for SummarizerCommand {
    fn default() -> Self {
        SummarizerCommand {
            program: "python".to_string(),
            args: vec!["-m".to_string(), "search_summarizer.cli".to_string()],
            working_dir: Some(PathBuf::from("../backend")),
            env: vec![
                ("PYTHONIOENCODING".to_string(), "utf-8".to_string()),
                ("PYTHONPATH".to_string(), "src".to_string()),
            ],
            timeout: Some(Duration::from_secs(120)),
        }
    }
}

impl SummarizerCommand {
    /// Full argument vector for one request, excluding the program itself.
    ///
    /// Options come first and `--` ends option parsing, so a query such as
    /// `--verbose` reaches the summarizer as plain text.
    pub fn argv(&self, request: &SearchRequest) -> Vec<OsString> {
        let options = request.options();
        let mut argv: Vec<OsString> = self.args.iter().map(OsString::from).collect();
        argv.extend(
            [
                "--max-results".to_string(),
                options.max_results.to_string(),
                "--max-pages".to_string(),
                options.max_pages.to_string(),
                "--max-sentences".to_string(),
                options.max_sentences.to_string(),
            ]
            .map(OsString::from),
        );
        if options.no_groq {
            argv.push("--no-groq".into());
        }
        if options.verbose {
            argv.push("--verbose".into());
        }
        argv.push("--".into());
        argv.push(request.query().into());
        argv
    }

    /// Run the summarizer once and collect everything it writes.
    ///
    /// A non-zero exit is returned as data; only a failure to start the
    /// process or a timeout is an error. The child is killed if this future
    /// is dropped before it exits.
    pub async fn invoke(
        &self,
        request: &SearchRequest,
    ) -> Result<RawExecutionResult, SearchError> {
        let argv = self.argv(request);
        tracing::debug!(program = %self.program, ?argv, "spawning summarizer");

        let mut command = Command::new(&self.program);
        command
            .args(&argv)
            .envs(self.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let start = Instant::now();
        let child = command.spawn().map_err(|source| SearchError::ProcessSpawn {
            program: self.program.clone(),
            source,
        })?;

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(output) => output,
                Err(_) => {
                    tracing::warn!(
                        timeout_secs = limit.as_secs(),
                        "summarizer timed out, killing it"
                    );
                    return Err(SearchError::Timeout(limit));
                }
            },
            None => child.wait_with_output().await,
        }
        .map_err(|e| SearchError::Internal(format!("failed to collect summarizer output: {e}")))?;

        let raw = RawExecutionResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        };

        tracing::info!(
            exit_code = ?raw.exit_code,
            stdout_bytes = raw.stdout.len(),
            stderr_bytes = raw.stderr.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "summarizer finished"
        );
        tracing::debug!(stdout = %raw.stdout, stderr = %raw.stderr, "summarizer raw output");

        Ok(raw)
    }
}
