//! Outbound backend client: completion and search calls with bounded retry.
//!
//! Both operations follow the same pattern: connectivity pre-flight, POST
//! with JSON payload, retry transport failures up to two more times (three
//! attempts total) with doubling backoff, treat any non-2xx status as
//! non-retryable, and degrade an unparseable 2xx body to a fixed fallback
//! string instead of an error.

pub mod scrub;
pub mod transport;

mod completion_types;
mod search_types;

use crate::config::{
    COMPLETION_MAX_OUTPUT_TOKENS, COMPLETION_TEMPERATURE, CompletionConfig, Config, RetryConfig,
    SearchConfig,
};
use crate::connectivity::Connectivity;
use crate::error::BackendError;
use completion_types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};
use scrub::sanitize_error_body;
use search_types::{SearchRequest, SearchResponse};
use std::sync::Arc;
use std::time::Duration;
use transport::{ReqwestTransport, Transport, WireResponse};

/// Returned for a 2xx response whose expected answer field is missing.
pub const PARSE_FALLBACK: &str = "Sorry, I couldn't understand the response.";

const MAX_BACKOFF_MS: u64 = 10_000;

pub struct BackendClient {
    transport: Arc<dyn Transport>,
    connectivity: Connectivity,
    completion: CompletionConfig,
    search: SearchConfig,
    retry: RetryConfig,
}

impl BackendClient {
    pub fn new(config: &Config, connectivity: Connectivity) -> Self {
        let transport = Arc::new(ReqwestTransport::new(Duration::from_secs(
            config.retry.request_timeout_secs,
        )));
        Self::with_transport(config, connectivity, transport)
    }

    /// Inject a transport; tests use this to script failures.
    pub fn with_transport(
        config: &Config,
        connectivity: Connectivity,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            transport,
            connectivity,
            completion: config.completion.clone(),
            search: config.search.clone(),
            retry: config.retry.clone(),
        }
    }

    /// Generate a reply for an assembled prompt.
    pub async fn complete(&self, prompt: &str) -> Result<String, BackendError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part::text(prompt.to_string())],
            }],
            generation_config: GenerationConfig {
                temperature: COMPLETION_TEMPERATURE,
                max_output_tokens: COMPLETION_MAX_OUTPUT_TOKENS,
            },
        };
        let payload = serde_json::to_value(&request)
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let url = completion_url(&self.completion);
        let response = self.post_with_retry("completion", &url, None, &payload).await?;

        Ok(serde_json::from_str::<GenerateContentResponse>(&response.body)
            .ok()
            .and_then(|r| r.first_text())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| PARSE_FALLBACK.to_string()))
    }

    /// Ask the search backend for a synthesized answer to a raw query.
    pub async fn search(&self, query: &str) -> Result<String, BackendError> {
        let payload = serde_json::to_value(SearchRequest::new(query.to_string()))
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let response = self
            .post_with_retry(
                "search",
                &self.search.endpoint,
                Some(self.search.api_key.as_str()),
                &payload,
            )
            .await?;

        Ok(serde_json::from_str::<SearchResponse>(&response.body)
            .ok()
            .and_then(|r| r.answer)
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| PARSE_FALLBACK.to_string()))
    }

    async fn post_with_retry(
        &self,
        label: &str,
        url: &str,
        bearer_token: Option<&str>,
        payload: &serde_json::Value,
    ) -> Result<WireResponse, BackendError> {
        if !self.connectivity.is_online() {
            tracing::warn!(backend = label, "skipping call, network known-down");
            return Err(BackendError::NetworkUnavailable);
        }

        let mut backoff_ms = self.retry.base_backoff_ms;
        let mut last_err = BackendError::Transport("no attempt made".to_string());

        for attempt in 0..=self.retry.max_retries {
            match self.transport.post_json(url, bearer_token, payload).await {
                Ok(response) if response.is_success() => {
                    if attempt > 0 {
                        tracing::info!(backend = label, attempt, "recovered after retries");
                    }
                    return Ok(response);
                }
                Ok(response) => {
                    tracing::error!(
                        backend = label,
                        status = response.status,
                        body = %sanitize_error_body(&response.body),
                        "backend returned error status"
                    );
                    return Err(BackendError::Status(response.status));
                }
                Err(e) => {
                    tracing::warn!(
                        backend = label,
                        attempt = attempt + 1,
                        max_attempts = self.retry.max_retries + 1,
                        error = %e,
                        "transport failure"
                    );
                    last_err = e;
                    if attempt < self.retry.max_retries {
                        tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                        backoff_ms = backoff_ms.saturating_mul(2).min(MAX_BACKOFF_MS);
                    }
                }
            }
        }

        Err(last_err)
    }
}

fn completion_url(config: &CompletionConfig) -> String {
    if config.api_key.is_empty() {
        config.endpoint.clone()
    } else {
        format!("{}?key={}", config.endpoint, config.api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockTransport {
        calls: Arc<AtomicUsize>,
        fail_until_attempt: usize,
        status: u16,
        body: &'static str,
    }

    impl MockTransport {
        fn ok(body: &'static str) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                fail_until_attempt: 0,
                status: 200,
                body,
            }
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn post_json(
            &self,
            _url: &str,
            _bearer_token: Option<&str>,
            _payload: &serde_json::Value,
        ) -> Result<WireResponse, BackendError> {
            let attempt = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if attempt <= self.fail_until_attempt {
                return Err(BackendError::Transport("connection reset".to_string()));
            }
            Ok(WireResponse {
                status: self.status,
                body: self.body.to_string(),
            })
        }
    }

    fn fast_config() -> Config {
        let mut config = Config::default();
        config.retry.base_backoff_ms = 1;
        config
    }

    fn client_with(transport: MockTransport, online: bool) -> (BackendClient, Arc<AtomicUsize>) {
        let calls = Arc::clone(&transport.calls);
        let client = BackendClient::with_transport(
            &fast_config(),
            Connectivity::new(online),
            Arc::new(transport),
        );
        (client, calls)
    }

    const COMPLETION_BODY: &str =
        r#"{"candidates":[{"content":{"parts":[{"text":"It rains tomorrow."}]}}]}"#;

    #[tokio::test]
    async fn completion_reads_candidate_text() {
        let (client, calls) = client_with(MockTransport::ok(COMPLETION_BODY), true);
        let text = client.complete("prompt").await.unwrap();
        assert_eq!(text, "It rains tomorrow.");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn search_reads_synthesized_answer() {
        let (client, _) = client_with(
            MockTransport::ok(r#"{"answer":"The score was 3-1.","results":[]}"#),
            true,
        );
        let text = client.search("score today").await.unwrap();
        assert_eq!(text, "The score was 3-1.");
    }

    #[tokio::test]
    async fn transport_failures_retry_to_three_attempts_total() {
        let transport = MockTransport {
            calls: Arc::new(AtomicUsize::new(0)),
            fail_until_attempt: 2,
            status: 200,
            body: COMPLETION_BODY,
        };
        let (client, calls) = client_with(transport, true);

        let text = client.complete("prompt").await.unwrap();
        assert_eq!(text, "It rains tomorrow.");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retries_exhaust_after_three_attempts() {
        let transport = MockTransport {
            calls: Arc::new(AtomicUsize::new(0)),
            fail_until_attempt: usize::MAX,
            status: 200,
            body: "",
        };
        let (client, calls) = client_with(transport, true);

        let err = client.complete("prompt").await.unwrap_err();
        assert!(matches!(err, BackendError::Transport(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn known_offline_makes_zero_attempts() {
        let (client, calls) = client_with(MockTransport::ok(COMPLETION_BODY), false);

        let err = client.complete("prompt").await.unwrap_err();
        assert!(matches!(err, BackendError::NetworkUnavailable));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn error_status_is_not_retried() {
        let transport = MockTransport {
            calls: Arc::new(AtomicUsize::new(0)),
            fail_until_attempt: 0,
            status: 503,
            body: r#"{"error":"overloaded"}"#,
        };
        let (client, calls) = client_with(transport, true);

        let err = client.complete("prompt").await.unwrap_err();
        assert!(matches!(err, BackendError::Status(503)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unparseable_success_degrades_to_fallback() {
        let (client, _) = client_with(MockTransport::ok(r#"{"unexpected":true}"#), true);
        let text = client.complete("prompt").await.unwrap();
        assert_eq!(text, PARSE_FALLBACK);
    }

    #[tokio::test]
    async fn empty_search_answer_degrades_to_fallback() {
        let (client, _) = client_with(MockTransport::ok(r#"{"answer":""}"#), true);
        let text = client.search("anything").await.unwrap();
        assert_eq!(text, PARSE_FALLBACK);
    }

    #[test]
    fn completion_url_appends_key_when_present() {
        let mut config = CompletionConfig::default();
        config.api_key = "k123".into();
        assert!(completion_url(&config).ends_with("?key=k123"));

        config.api_key.clear();
        assert!(!completion_url(&config).contains("?key="));
    }
}
