//! HTTP request client with timeout and linear-backoff retry.

use super::validator::ResponseValidator;
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// A raw HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues a single GET request.
///
/// Implementations report connection-level failures as [`Error::Network`]
/// and return non-2xx statuses as a normal [`HttpResponse`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<HttpResponse>;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("moverwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<HttpResponse> {
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

/// Query parameters for one provider call, minus the API key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Start a query for the given provider `function`.
    pub fn function(name: &str) -> Self {
        Self(vec![("function".to_string(), name.to_string())])
    }

    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.push((key.to_string(), value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Stateless request client.
///
/// Each call builds the query from the configured base URL and API key,
/// bounds every attempt by the configured timeout, and retries transient
/// failures with a linear backoff of `attempt * base_delay`.
#[derive(Clone)]
pub struct RequestClient {
    config: ApiConfig,
    transport: Arc<dyn Transport>,
}

impl RequestClient {
    pub fn new(config: ApiConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Perform a GET and parse the body as JSON.
    ///
    /// Only [`Error::Timeout`] and [`Error::Network`] are retried. HTTP and
    /// payload errors return on the first occurrence.
    pub async fn request(&self, params: &QueryParams) -> Result<Value> {
        let api_key = self.config.api_key()?;

        let mut query = params.0.clone();
        query.push(("apikey".to_string(), api_key.to_string()));

        let function = params.get("function").unwrap_or("?");
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            tracing::debug!(function, attempt, "sending request");

            match self.attempt(&query).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    let delay = self.backoff(attempt);
                    tracing::warn!(
                        function,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "transient failure, retrying: {}",
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::debug!(function, attempt, "request failed: {}", e);
                    return Err(e);
                }
            }
        }
    }

    async fn attempt(&self, query: &[(String, String)]) -> Result<Value> {
        // Dropping the transport future on expiry aborts the in-flight call.
        let response = tokio::time::timeout(
            self.config.timeout(),
            self.transport.get(&self.config.base_url, query),
        )
        .await
        .map_err(|_| Error::Timeout)??;

        if !response.is_success() {
            // Rate limits sometimes arrive as 429 with the usual sentinel body.
            if let Ok(body) = serde_json::from_str::<Value>(&response.body)
                && let Some(message) = ResponseValidator::sentinel_message(&body)
            {
                return Err(Error::provider(message));
            }
            return Err(Error::Http {
                status: response.status,
            });
        }

        serde_json::from_str(&response.body)
            .map_err(|e| Error::malformed(format!("response is not JSON: {e}")))
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.config.retry_base_delay() * attempt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    fn config() -> ApiConfig {
        ApiConfig {
            api_key: Some("TESTKEY".to_string()),
            ..ApiConfig::default()
        }
    }

    fn client(transport: impl Transport + 'static) -> RequestClient {
        RequestClient::new(config(), Arc::new(transport))
    }

    /// Fails with a network error a fixed number of times, then succeeds.
    struct Flaky {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl Transport for Flaky {
        async fn get(&self, _url: &str, _query: &[(String, String)]) -> Result<HttpResponse> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(Error::network("connection reset"))
            } else {
                Ok(HttpResponse::ok(r#"{"ok":true}"#))
            }
        }
    }

    /// Never answers.
    struct Hanging {
        calls: AtomicU32,
    }

    #[async_trait]
    impl Transport for Hanging {
        async fn get(&self, _url: &str, _query: &[(String, String)]) -> Result<HttpResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_request_appends_api_key_and_params() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .withf(|url, query| {
                url == "https://www.alphavantage.co/query"
                    && query.contains(&("function".to_string(), "SYMBOL_SEARCH".to_string()))
                    && query.contains(&("keywords".to_string(), "app".to_string()))
                    && query.contains(&("apikey".to_string(), "TESTKEY".to_string()))
            })
            .times(1)
            .returning(|_, _| Ok(HttpResponse::ok(r#"{"bestMatches":[]}"#)));

        let value = client(transport)
            .request(&QueryParams::function("SYMBOL_SEARCH").param("keywords", "app"))
            .await
            .unwrap();
        assert_eq!(value["bestMatches"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_network() {
        let mut transport = MockTransport::new();
        transport.expect_get().never();

        let client = RequestClient::new(ApiConfig::default(), Arc::new(transport));
        let err = client
            .request(&QueryParams::function("TOP_GAINERS_LOSERS"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_errors_retry_with_linear_backoff() {
        let transport = Arc::new(Flaky {
            failures: 2,
            calls: AtomicU32::new(0),
        });
        let client = RequestClient::new(config(), transport.clone());

        let start = Instant::now();
        let value = client
            .request(&QueryParams::function("GLOBAL_QUOTE"))
            .await
            .unwrap();

        assert_eq!(value["ok"], true);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
        // 1 * 1000ms after the first failure, 2 * 1000ms after the second.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(3_000), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(3_100), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_three_attempts() {
        let transport = Arc::new(Flaky {
            failures: 10,
            calls: AtomicU32::new(0),
        });
        let client = RequestClient::new(config(), transport.clone());

        let err = client
            .request(&QueryParams::function("GLOBAL_QUOTE"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Network(_)));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_aborts_and_retries() {
        let transport = Arc::new(Hanging {
            calls: AtomicU32::new(0),
        });
        let client = RequestClient::new(config(), transport.clone());

        let start = Instant::now();
        let err = client
            .request(&QueryParams::function("OVERVIEW"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Timeout));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
        // Three 10s timeouts plus 1s and 2s of backoff.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(33_000), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(33_100), "{elapsed:?}");
    }

    #[tokio::test]
    async fn test_http_error_is_not_retried() {
        let mut transport = MockTransport::new();
        transport.expect_get().times(1).returning(|_, _| {
            Ok(HttpResponse {
                status: 503,
                body: "Service Unavailable".to_string(),
            })
        });

        let err = client(transport)
            .request(&QueryParams::function("TOP_GAINERS_LOSERS"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Http { status: 503 }));
    }

    #[tokio::test]
    async fn test_429_with_sentinel_surfaces_provider_message() {
        let mut transport = MockTransport::new();
        transport.expect_get().times(1).returning(|_, _| {
            Ok(HttpResponse {
                status: 429,
                body: r#"{"Note":"Thank you for using Alpha Vantage! Please slow down."}"#
                    .to_string(),
            })
        });

        let err = client(transport)
            .request(&QueryParams::function("TOP_GAINERS_LOSERS"))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Thank you for using Alpha Vantage! Please slow down."
        );
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_, _| Ok(HttpResponse::ok("<html>oops</html>")));

        let err = client(transport)
            .request(&QueryParams::function("OVERVIEW"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn test_query_params_lookup() {
        let params = QueryParams::function("TIME_SERIES_INTRADAY")
            .param("symbol", "IBM")
            .param("interval", "5min");
        assert_eq!(params.get("function"), Some("TIME_SERIES_INTRADAY"));
        assert_eq!(params.get("interval"), Some("5min"));
        assert_eq!(params.get("apikey"), None);
    }
}
