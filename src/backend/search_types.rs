use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct SearchRequest {
    pub(super) query: String,
    pub(super) search_depth: &'static str,
    pub(super) max_results: u32,
    pub(super) include_answer: bool,
}

impl SearchRequest {
    pub(super) fn new(query: String) -> Self {
        Self {
            query,
            search_depth: "advanced",
            max_results: 5,
            include_answer: true,
        }
    }
}

/// Only the synthesized answer is consumed; raw result lists are discarded.
#[derive(Debug, Deserialize)]
pub(super) struct SearchResponse {
    pub(super) answer: Option<String>,
}
