//! High-level client — `CoinwatchClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, the shared configuration, and the
//! `MarketSource` implementation the engines run against.

use crate::domain::coin::client::Coins;
use crate::domain::coin::{DetailRecord, Page};
use crate::domain::price_history::client::PriceHistoryClient;
use crate::domain::price_history::HistorySeries;
use crate::error::SdkError;
use crate::http::{GeckoHttp, RetryPolicy};
use crate::network::{DEFAULT_API_URL, DEFAULT_TIMEOUT, DEFAULT_VS_CURRENCY};
use crate::shared::{CoinId, HistoryWindow};
use crate::source::MarketSource;

use async_trait::async_trait;
use std::time::Duration;

// Re-export sub-client types for convenience.
pub use crate::domain::coin::client::Coins as CoinsClient;
pub use crate::domain::price_history::client::PriceHistoryClient as PriceHistorySubClient;

/// The primary entry point for market data.
///
/// Provides nested sub-client accessors: `client.coins()`, `client.price_history()`.
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct CoinwatchClient {
    pub(crate) http: GeckoHttp,
    pub(crate) vs_currency: String,
}

impl CoinwatchClient {
    pub fn builder() -> CoinwatchClientBuilder {
        CoinwatchClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn coins(&self) -> Coins<'_> {
        Coins { client: self }
    }

    pub fn price_history(&self) -> PriceHistoryClient<'_> {
        PriceHistoryClient { client: self }
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    pub fn vs_currency(&self) -> &str {
        &self.vs_currency
    }
}

#[async_trait]
impl MarketSource for CoinwatchClient {
    async fn list_markets(&self, page: u32, per_page: u32) -> Result<Page, SdkError> {
        self.coins().list(page, per_page).await
    }

    async fn get_detail(&self, id: &CoinId) -> Result<DetailRecord, SdkError> {
        self.coins().get(id).await
    }

    async fn get_history(
        &self,
        id: &CoinId,
        window: HistoryWindow,
    ) -> Result<HistorySeries, SdkError> {
        self.price_history().get(id, window).await
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct CoinwatchClientBuilder {
    base_url: String,
    timeout: Duration,
    vs_currency: String,
    retry: RetryPolicy,
}

impl Default for CoinwatchClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            vs_currency: DEFAULT_VS_CURRENCY.to_string(),
            retry: RetryPolicy::None,
        }
    }
}

impl CoinwatchClientBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Per-request timeout (native targets only).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Quote currency for prices and market caps, e.g. `"usd"`.
    pub fn vs_currency(mut self, currency: &str) -> Self {
        self.vs_currency = currency.to_lowercase();
        self
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn build(self) -> Result<CoinwatchClient, SdkError> {
        if self.base_url.trim().is_empty() {
            return Err(SdkError::Validation("base_url must not be empty".into()));
        }
        if self.vs_currency.trim().is_empty() {
            return Err(SdkError::Validation("vs_currency must not be empty".into()));
        }
        tracing::debug!(base_url = %self.base_url, vs = %self.vs_currency, "Building client");
        Ok(CoinwatchClient {
            http: GeckoHttp::new(&self.base_url, self.timeout)?.with_retry(self.retry),
            vs_currency: self.vs_currency,
        })
    }
}
