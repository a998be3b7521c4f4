#![cfg(unix)]

use anyhow::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};

use gleaner::data_models::{SearchOptions, SearchRequest};
use gleaner::error::SearchError;
use gleaner::extractor::Markers;
use gleaner::invoker::SummarizerCommand;
use gleaner::pipeline::SearchService;

fn service(script: &str, max_concurrent: usize) -> SearchService {
    let command = SummarizerCommand {
        program: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string(), "summarizer".to_string()],
        working_dir: None,
        env: vec![],
        timeout: Some(Duration::from_secs(10)),
    };
    SearchService::new(command, Markers::default(), max_concurrent)
}

fn request(query: &str) -> SearchRequest {
    SearchRequest::new(query, SearchOptions::default()).unwrap()
}

#[tokio::test]
async fn test_search_extracts_result() -> Result<()> {
    let service = service(
        r#"printf '%s\n' '--- Resumo ---' '{"tipo": "mercado"}' 'Fontes utilizadas:' 'https://a.com'"#,
        1,
    );
    let result = service.search(&request("q")).await?;
    assert_eq!(result.structured.unwrap()["tipo"], "mercado");
    assert_eq!(result.sources, vec!["https://a.com"]);
    Ok(())
}

#[tokio::test]
async fn test_search_propagates_backend_failure() {
    let service = service("echo boom >&2; exit 2", 1);
    match service.search(&request("q")).await {
        Err(SearchError::BackendFailure { exit_code, stderr }) => {
            assert_eq!(exit_code, Some(2));
            assert_eq!(stderr, "boom\n");
        }
        other => panic!("expected backend failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_concurrency_limit_serializes_searches() -> Result<()> {
    let service = Arc::new(service("sleep 0.3", 1));
    let start = Instant::now();

    let first = tokio::spawn({
        let service = service.clone();
        async move { service.search(&request("one")).await }
    });
    let second = tokio::spawn({
        let service = service.clone();
        async move { service.search(&request("two")).await }
    });
    first.await??;
    second.await??;

    assert!(start.elapsed() >= Duration::from_millis(600));
    Ok(())
}
