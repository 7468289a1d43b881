//! Per-turn routing: clarify location, hit the search backend, or fall
//! through to the completion backend.
//!
//! Matching is plain substring containment against fixed keyword tables,
//! case-insensitive, first match wins. No scoring.

/// Terms that imply the user wants something anchored to a place.
const LOCATION_KEYWORDS: &[&str] = &[
    "near me",
    "nearby",
    "location",
    "where",
    "weather",
    "closest",
    "directions",
    "restaurant",
    "hotel",
    "gas station",
    "store",
    "coffee shop",
    "pharmacy",
];

/// Temporal, factual and local-intent terms answered better by live search.
const SEARCH_KEYWORDS: &[&str] = &[
    "find",
    "search",
    "look up",
    "news",
    "who is",
    "who won",
    "weather",
    "price",
    "stock",
    "score",
    "today",
    "tonight",
    "latest",
    "current",
    "recent",
    "open now",
    "happening",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingDecision {
    /// Ask the fixed clarifying question and end the turn without a backend
    /// call.
    NeedsLocation,
    UseSearch,
    UseCompletion,
}

/// Classify one user utterance.
pub fn route(utterance: &str, location_provided: bool) -> RoutingDecision {
    let lowered = utterance.to_lowercase();

    if !location_provided && contains_any(&lowered, LOCATION_KEYWORDS) {
        return RoutingDecision::NeedsLocation;
    }
    if contains_any(&lowered, SEARCH_KEYWORDS) {
        return RoutingDecision::UseSearch;
    }
    RoutingDecision::UseCompletion
}

fn contains_any(lowered: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| lowered.contains(k))
}
