use axum::{Json, extract::State, extract::rejection::JsonRejection};
use std::sync::Arc;

use crate::data_models::{INVALID_QUERY, SearchRequest};
use crate::error::SearchError;
use crate::pipeline::SearchService;
use crate::renderer;

use super::models::{SearchBody, SearchResponse};

pub async fn search_handler(
    State(service): State<Arc<SearchService>>,
    payload: Result<Json<SearchBody>, JsonRejection>,
) -> Result<Json<SearchResponse>, SearchError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!("rejected search body: {}", rejection.body_text());
        SearchError::InvalidInput(rejection.body_text())
    })?;

    let query = body
        .query
        .ok_or_else(|| SearchError::InvalidInput(INVALID_QUERY.to_string()))?;
    let request = SearchRequest::new(query, body.options)?;

    let result = service.search(&request).await?;
    let report = result
        .structured
        .as_ref()
        .map(renderer::render)
        .unwrap_or_default();

    Ok(Json(SearchResponse { result, report }))
}

pub async fn health_handler() -> &'static str {
    "ok"
}
