use std::sync::Arc;

use nanoid::nanoid;
use tokio::sync::Semaphore;
use tracing::Instrument;

use crate::data_models::{ExtractedResult, SearchRequest};
use crate::error::SearchError;
use crate::extractor::{self, Markers};
use crate::invoker::SummarizerCommand;

/// Runs one search end to end: wait for a slot, invoke the summarizer,
/// extract its result.
pub struct SearchService {
    command: SummarizerCommand,
    markers: Markers,
    concurrent_searches: Arc<Semaphore>,
}

impl SearchService {
    pub fn new(
        command: SummarizerCommand,
        markers: Markers,
        max_concurrent_searches: usize,
    ) -> SearchService {
        SearchService {
            command,
            markers,
            concurrent_searches: Arc::new(Semaphore::new(max_concurrent_searches.max(1))),
        }
    }

    pub fn command(&self) -> &SummarizerCommand {
        &self.command
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<ExtractedResult, SearchError> {
        let span = tracing::info_span!("search", id = %nanoid!(8));
        async {
            tracing::info!(
                query = %request.query(),
                options = ?request.options(),
                "search started"
            );

            let _permit = self
                .concurrent_searches
                .acquire()
                .await
                .map_err(|e| SearchError::Internal(format!("search limiter closed: {e}")))?;

            let raw = self.command.invoke(request).await?;
            let extracted = extractor::extract(&raw, &self.markers)?;

            tracing::info!(
                structured = extracted.structured.is_some(),
                sources = extracted.sources.len(),
                "search finished"
            );
            Ok::<_, SearchError>(extracted)
        }
        .instrument(span)
        .await
    }
}
