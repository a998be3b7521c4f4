use serde::{Deserialize, Serialize};

use crate::data_models::{ExtractedResult, SearchOptions};
use crate::renderer::RenderedSection;

/// Body of `POST /api/search`. `query` is optional here so that a missing
/// query is reported as invalid input rather than as a decode failure.
#[derive(Debug, Deserialize)]
pub struct SearchBody {
    pub query: Option<String>,
    #[serde(flatten)]
    pub options: SearchOptions,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    #[serde(flatten)]
    pub result: ExtractedResult,
    pub report: Vec<RenderedSection>,
}
