use anyhow::Result;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use gleaner::Config;
use gleaner::extractor::Markers;

fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn test_defaults() -> Result<()> {
    let config = config_from(&[])?;
    assert_eq!(config.bind_addr, "0.0.0.0:3000");
    assert_eq!(config.static_dir, PathBuf::from("static"));
    assert_eq!(config.max_concurrent_searches, 4);
    assert_eq!(config.markers, Markers::default());
    assert_eq!(config.summarizer.program, "python");
    assert_eq!(config.summarizer.args, vec!["-m", "search_summarizer.cli"]);
    assert_eq!(config.summarizer.working_dir, Some(PathBuf::from("../backend")));
    assert_eq!(config.summarizer.timeout, Some(Duration::from_secs(120)));
    assert!(
        config
            .summarizer
            .env
            .contains(&("PYTHONPATH".to_string(), "src".to_string()))
    );
    assert!(
        config
            .summarizer
            .env
            .contains(&("PYTHONIOENCODING".to_string(), "utf-8".to_string()))
    );
    Ok(())
}

#[test]
fn test_overrides() -> Result<()> {
    let config = config_from(&[
        ("BIND_ADDR", "127.0.0.1:8080"),
        ("STATIC_DIR", "/srv/ui"),
        ("SUMMARIZER_PROGRAM", "/usr/bin/summarize"),
        ("SUMMARIZER_ARGS", "  run   --quiet "),
        ("SUMMARIZER_WORKDIR", "/opt/backend"),
        ("SUMMARIZER_TIMEOUT_SECS", "30"),
        ("MAX_CONCURRENT_SEARCHES", "16"),
        ("SUMMARY_MARKER", "--- Summary ---"),
        ("SOURCES_MARKER", "Sources used:"),
    ])?;
    assert_eq!(config.bind_addr, "127.0.0.1:8080");
    assert_eq!(config.static_dir, PathBuf::from("/srv/ui"));
    assert_eq!(config.summarizer.program, "/usr/bin/summarize");
    assert_eq!(config.summarizer.args, vec!["run", "--quiet"]);
    assert_eq!(config.summarizer.working_dir, Some(PathBuf::from("/opt/backend")));
    assert_eq!(config.summarizer.timeout, Some(Duration::from_secs(30)));
    assert_eq!(config.max_concurrent_searches, 16);
    assert_eq!(config.markers.summary, "--- Summary ---");
    assert_eq!(config.markers.sources, "Sources used:");
    Ok(())
}

#[test]
fn test_empty_values_disable_optional_settings() -> Result<()> {
    let config = config_from(&[
        ("SUMMARIZER_ARGS", ""),
        ("SUMMARIZER_WORKDIR", ""),
        ("SUMMARIZER_PYTHONPATH", ""),
        ("SUMMARIZER_TIMEOUT_SECS", "0"),
    ])?;
    assert!(config.summarizer.args.is_empty());
    assert_eq!(config.summarizer.working_dir, None);
    assert_eq!(config.summarizer.timeout, None);
    assert_eq!(
        config.summarizer.env,
        vec![("PYTHONIOENCODING".to_string(), "utf-8".to_string())]
    );
    Ok(())
}

#[test]
fn test_invalid_number_names_the_variable() {
    let err = config_from(&[("SUMMARIZER_TIMEOUT_SECS", "soon")]).unwrap_err();
    assert!(format!("{err:#}").contains("SUMMARIZER_TIMEOUT_SECS"));
}

#[test]
fn test_zero_concurrency_is_rejected() {
    let err = config_from(&[("MAX_CONCURRENT_SEARCHES", "0")]).unwrap_err();
    assert!(err.to_string().contains("MAX_CONCURRENT_SEARCHES"));
}
