use anyhow::{Context, Result, bail};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::extractor::Markers;
use crate::invoker::SummarizerCommand;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub static_dir: PathBuf,
    pub summarizer: SummarizerCommand,
    pub markers: Markers,
    pub max_concurrent_searches: usize,
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Tests use this to
    /// avoid mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let timeout_secs: u64 = parse_var(&lookup, "SUMMARIZER_TIMEOUT_SECS", 120)?;
        let max_concurrent_searches: usize = parse_var(&lookup, "MAX_CONCURRENT_SEARCHES", 4)?;
        if max_concurrent_searches == 0 {
            bail!("MAX_CONCURRENT_SEARCHES must be at least 1");
        }

        let defaults = SummarizerCommand::default();
        let args = match lookup("SUMMARIZER_ARGS") {
            Some(raw) => raw.split_whitespace().map(str::to_string).collect(),
            None => defaults.args,
        };
        let working_dir = match lookup("SUMMARIZER_WORKDIR") {
            Some(dir) if dir.trim().is_empty() => None,
            Some(dir) => Some(PathBuf::from(dir)),
            None => defaults.working_dir,
        };
        let mut env_vars = vec![("PYTHONIOENCODING".to_string(), "utf-8".to_string())];
        let python_path = get_or_default("SUMMARIZER_PYTHONPATH", "src");
        if !python_path.trim().is_empty() {
            env_vars.push(("PYTHONPATH".to_string(), python_path));
        }

        let summarizer = SummarizerCommand {
            program: get_or_default("SUMMARIZER_PROGRAM", &defaults.program),
            args,
            working_dir,
            env: env_vars,
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        };

        let default_markers = Markers::default();
        let markers = Markers {
            summary: get_or_default("SUMMARY_MARKER", &default_markers.summary),
            sources: get_or_default("SOURCES_MARKER", &default_markers.sources),
        };

        Ok(Self {
            bind_addr: get_or_default("BIND_ADDR", "0.0.0.0:3000"),
            static_dir: PathBuf::from(get_or_default("STATIC_DIR", "static")),
            summarizer,
            markers,
            max_concurrent_searches,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid number, got {raw:?}")),
        None => Ok(default),
    }
}
