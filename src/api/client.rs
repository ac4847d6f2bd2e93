//! Alpha Vantage API client wrapper.

use super::request::{QueryParams, ReqwestTransport, RequestClient, Transport};
use super::validator::ResponseValidator;
use crate::cache::{CacheKey, QuoteKind, ResponseCache};
use crate::config::{ApiConfig, CacheConfig};
use crate::error::{Error, Result};
use crate::search::{SymbolMatch, SymbolSearch};
use crate::state::{Interval, Movers, PricePoint, Quote, StockOverview};
use async_trait::async_trait;
use std::sync::Arc;

/// A validated provider response, as stored in the response cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Movers(Movers),
    Matches(Vec<SymbolMatch>),
    Overview(StockOverview),
    Quote(Quote),
    Series(Vec<PricePoint>),
}

/// Builder for creating an API client.
pub struct ApiClientBuilder {
    config: ApiConfig,
    transport: Option<Arc<dyn Transport>>,
    cache: Option<Arc<ResponseCache<Payload>>>,
}

impl ApiClientBuilder {
    /// Create a new builder with default config.
    pub fn new() -> Self {
        Self {
            config: ApiConfig::default(),
            transport: None,
            cache: None,
        }
    }

    /// Set the API configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom transport instead of `reqwest`.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Share an existing response cache.
    pub fn cache(mut self, cache: Arc<ResponseCache<Payload>>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Build the API client.
    pub fn build(self) -> Result<ApiClient> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(ResponseCache::from_config(&CacheConfig::default())));

        Ok(ApiClient {
            requests: RequestClient::new(self.config, transport),
            cache,
        })
    }
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// High-level API client for Alpha Vantage.
///
/// Every operation runs request → validation → cache write. Cache hits skip
/// both the network and validation.
#[derive(Clone)]
pub struct ApiClient {
    requests: RequestClient,
    cache: Arc<ResponseCache<Payload>>,
}

impl ApiClient {
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::new()
    }

    /// The shared response cache.
    pub fn cache(&self) -> &Arc<ResponseCache<Payload>> {
        &self.cache
    }

    /// Fetch top gainers, losers and most active symbols.
    pub async fn fetch_movers(&self) -> Result<Movers> {
        let payload = self
            .cache
            .get_or_fetch(CacheKey::movers(), || async {
                let raw = self
                    .requests
                    .request(&QueryParams::function("TOP_GAINERS_LOSERS"))
                    .await?;
                ResponseValidator::validate_movers(raw).map(Payload::Movers)
            })
            .await?;

        match payload {
            Payload::Movers(movers) => Ok(movers),
            other => Err(mismatch("movers", &other)),
        }
    }

    /// Drop cached movers and fetch them again.
    pub async fn refresh_movers(&self) -> Result<Movers> {
        self.cache.invalidate(&CacheKey::movers()).await;
        self.fetch_movers().await
    }

    /// Search symbols by keywords. Blank keywords return nothing without a request.
    pub async fn search_symbols(&self, keywords: &str) -> Result<Vec<SymbolMatch>> {
        let keywords = keywords.trim();
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let payload = self
            .cache
            .get_or_fetch(CacheKey::search(keywords), || async {
                let raw = self
                    .requests
                    .request(&QueryParams::function("SYMBOL_SEARCH").param("keywords", keywords))
                    .await?;
                ResponseValidator::validate_search(raw).map(Payload::Matches)
            })
            .await?;

        match payload {
            Payload::Matches(matches) => Ok(matches),
            other => Err(mismatch("symbol search", &other)),
        }
    }

    /// Fetch company fundamentals.
    pub async fn fetch_overview(&self, symbol: &str) -> Result<StockOverview> {
        let symbol = normalize_symbol(symbol)?;
        let payload = self
            .cache
            .get_or_fetch(CacheKey::new(QuoteKind::Overview, &symbol), || async {
                let raw = self
                    .requests
                    .request(&QueryParams::function("OVERVIEW").param("symbol", &symbol))
                    .await?;
                ResponseValidator::validate_overview(raw, &symbol).map(Payload::Overview)
            })
            .await?;

        match payload {
            Payload::Overview(overview) => Ok(overview),
            other => Err(mismatch("overview", &other)),
        }
    }

    /// Fetch the latest quote for one symbol.
    pub async fn fetch_quote(&self, symbol: &str) -> Result<Quote> {
        let symbol = normalize_symbol(symbol)?;
        let payload = self
            .cache
            .get_or_fetch(CacheKey::new(QuoteKind::GlobalQuote, &symbol), || async {
                let raw = self
                    .requests
                    .request(&QueryParams::function("GLOBAL_QUOTE").param("symbol", &symbol))
                    .await?;
                ResponseValidator::validate_quote(raw, &symbol).map(Payload::Quote)
            })
            .await?;

        match payload {
            Payload::Quote(quote) => Ok(quote),
            other => Err(mismatch("quote", &other)),
        }
    }

    /// Fetch intraday bars, oldest first.
    pub async fn fetch_intraday(&self, symbol: &str, interval: Interval) -> Result<Vec<PricePoint>> {
        let symbol = normalize_symbol(symbol)?;
        let key = CacheKey::new(QuoteKind::Intraday(interval), &symbol);
        let payload = self
            .cache
            .get_or_fetch(key, || async {
                let raw = self
                    .requests
                    .request(
                        &QueryParams::function("TIME_SERIES_INTRADAY")
                            .param("symbol", &symbol)
                            .param("interval", interval.as_str()),
                    )
                    .await?;
                ResponseValidator::validate_intraday(raw, interval).map(Payload::Series)
            })
            .await?;

        match payload {
            Payload::Series(series) => Ok(series),
            other => Err(mismatch("intraday series", &other)),
        }
    }
}

#[async_trait]
impl SymbolSearch for ApiClient {
    async fn search_symbols(&self, keywords: &str) -> Result<Vec<SymbolMatch>> {
        ApiClient::search_symbols(self, keywords).await
    }
}

fn normalize_symbol(symbol: &str) -> Result<String> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() || symbol.chars().any(char::is_whitespace) {
        return Err(Error::invalid_input(format!("invalid symbol '{symbol}'")));
    }
    Ok(symbol)
}

fn mismatch(expected: &str, found: &Payload) -> Error {
    Error::malformed(format!("cached payload is not {expected}: {found:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::request::{HttpResponse, MockTransport};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tokio_test::assert_ok;

    fn client_with(transport: MockTransport) -> ApiClient {
        ApiClient::builder()
            .config(ApiConfig {
                api_key: Some("TESTKEY".to_string()),
                ..ApiConfig::default()
            })
            .transport(Arc::new(transport))
            .build()
            .unwrap()
    }

    fn has_param(query: &[(String, String)], key: &str, value: &str) -> bool {
        query.iter().any(|(k, v)| k == key && v == value)
    }

    const MOVERS_BODY: &str = r#"{
        "top_gainers": [{"ticker":"AAPL","price":"190.00","change_amount":"4.0","change_percentage":"2.1%","volume":"100"}],
        "top_losers": [{"ticker":"MSFT","price":"400.00","change_amount":"-4.0","change_percentage":"-1.0%","volume":"200"}],
        "most_actively_traded": []
    }"#;

    #[tokio::test]
    async fn test_movers_are_cached_after_first_fetch() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .withf(|_, query| has_param(query, "function", "TOP_GAINERS_LOSERS"))
            .times(1)
            .returning(|_, _| Ok(HttpResponse::ok(MOVERS_BODY)));
        let client = client_with(transport);

        let first = assert_ok!(client.fetch_movers().await);
        let second = assert_ok!(client.fetch_movers().await);
        assert_eq!(first, second);
        assert_eq!(first.gainers[0].price, dec!(190.00));
    }

    #[tokio::test]
    async fn test_refresh_movers_bypasses_cache() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .times(2)
            .returning(|_, _| Ok(HttpResponse::ok(MOVERS_BODY)));
        let client = client_with(transport);

        assert_ok!(client.fetch_movers().await);
        assert_ok!(client.refresh_movers().await);
    }

    #[tokio::test]
    async fn test_provider_error_is_not_cached() {
        let mut transport = MockTransport::new();
        let mut seq = mockall::Sequence::new();
        transport
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(HttpResponse::ok(r#"{"Information":"Thank you for using Alpha Vantage!"}"#)));
        transport
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(HttpResponse::ok(MOVERS_BODY)));
        let client = client_with(transport);

        let err = client.fetch_movers().await.unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
        assert!(client.cache().is_empty().await);

        assert_ok!(client.fetch_movers().await);
    }

    #[tokio::test]
    async fn test_overview_normalizes_symbol() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .withf(|_, query| has_param(query, "function", "OVERVIEW") && has_param(query, "symbol", "IBM"))
            .times(1)
            .returning(|_, _| Ok(HttpResponse::ok(r#"{"Symbol":"IBM","Name":"IBM Corp","Beta":"0.7"}"#)));
        let client = client_with(transport);

        let overview = assert_ok!(client.fetch_overview(" ibm ").await);
        assert_eq!(overview.beta, Some(dec!(0.7)));
        // Same key regardless of case.
        assert_ok!(client.fetch_overview("IBM").await);
    }

    #[tokio::test]
    async fn test_blank_search_makes_no_request() {
        let mut transport = MockTransport::new();
        transport.expect_get().never();
        let client = client_with(transport);

        assert_eq!(assert_ok!(client.search_symbols("   ").await), Vec::new());
    }

    #[tokio::test]
    async fn test_intraday_sends_interval() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .withf(|_, query| has_param(query, "interval", "15min"))
            .times(1)
            .returning(|_, _| {
                Ok(HttpResponse::ok(
                    r#"{"Time Series (15min)": {"2024-01-05 15:45:00": {"1. open":"1","2. high":"2","3. low":"1","4. close":"2","5. volume":"5"}}}"#,
                ))
            });
        let client = client_with(transport);

        let series = assert_ok!(client.fetch_intraday("AAPL", Interval::Min15).await);
        assert_eq!(series.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_symbol_rejected() {
        let mut transport = MockTransport::new();
        transport.expect_get().never();
        let client = client_with(transport);

        assert!(matches!(
            client.fetch_quote("BRK B").await,
            Err(Error::InvalidInput(_))
        ));
    }
}
