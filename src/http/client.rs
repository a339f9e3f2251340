//! Low-level HTTP client — `GeckoHttp`.
//!
//! One method per API endpoint. Returns wire types (conversion to domain types
//! happens in the sub-clients). `CoinwatchClient` wraps this.

use crate::domain::coin::wire::{CoinDetailResponse, CoinMarketResponse, SearchResponse};
use crate::domain::price_history::wire::MarketChartResponse;
use crate::error::HttpError;
use crate::http::retry::{RetryConfig, RetryPolicy};
use crate::shared::HistoryWindow;

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing;

/// Low-level HTTP client for the market data REST API.
#[derive(Clone)]
pub struct GeckoHttp {
    base_url: String,
    client: Client,
    retry: RetryPolicy,
}

impl GeckoHttp {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, HttpError> {
        let mut builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder.timeout(timeout).pool_max_idle_per_host(10);
        }
        #[cfg(target_arch = "wasm32")]
        let _ = timeout;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
            retry: RetryPolicy::None,
        })
    }

    /// Retry policy applied to every GET. Defaults to no retries.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Markets ──────────────────────────────────────────────────────────

    pub async fn get_markets(
        &self,
        vs_currency: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<CoinMarketResponse>, HttpError> {
        self.get(&markets_url(&self.base_url, vs_currency, page, per_page))
            .await
    }

    // ── Coin detail ──────────────────────────────────────────────────────

    pub async fn get_coin(&self, id: &str) -> Result<CoinDetailResponse, HttpError> {
        self.get(&coin_url(&self.base_url, id)).await
    }

    // ── Price history ────────────────────────────────────────────────────

    pub async fn get_market_chart(
        &self,
        id: &str,
        vs_currency: &str,
        window: HistoryWindow,
    ) -> Result<MarketChartResponse, HttpError> {
        self.get(&chart_url(&self.base_url, id, vs_currency, window))
            .await
    }

    // ── Search ───────────────────────────────────────────────────────────

    pub async fn search(&self, query: &str) -> Result<SearchResponse, HttpError> {
        self.get(&search_url(&self.base_url, query)).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        tracing::debug!("GET {}", url);
        self.request_with_retry(url, self.retry.clone()).await
    }

    async fn request_with_retry<T: DeserializeOwned>(
        &self,
        url: &str,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        let config = match &retry {
            RetryPolicy::None => {
                return self.do_request(url).await;
            }
            RetryPolicy::Idempotent => RetryConfig::idempotent(),
            RetryPolicy::Custom(c) => c.clone(),
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_request::<T>(url).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    let should_retry = match &e {
                        HttpError::ServerError { status, .. } => {
                            config.retryable_statuses.contains(status)
                        }
                        HttpError::RateLimited { retry_after_ms } => {
                            if let Some(ms) = retry_after_ms {
                                futures_timer::Delay::new(Duration::from_millis(*ms)).await;
                            }
                            config.retryable_statuses.contains(&429)
                        }
                        HttpError::Timeout => true,
                        HttpError::Reqwest(re) => {
                            #[cfg(not(target_arch = "wasm32"))]
                            let retryable = re.is_connect() || re.is_timeout() || re.is_request();
                            #[cfg(target_arch = "wasm32")]
                            let retryable = re.is_timeout() || re.is_request();
                            retryable
                        }
                        _ => false,
                    };

                    if should_retry && attempt < config.max_retries {
                        let delay = config.delay_for_attempt(attempt);
                        tracing::debug!(
                            attempt = attempt + 1,
                            max = config.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            "Retrying request to {}",
                            url
                        );
                        futures_timer::Delay::new(delay).await;
                        last_error = Some(e);
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_request<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        let resp = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = resp.status();

        if status.is_success() {
            return Ok(resp.json::<T>().await?);
        }

        let status_code = status.as_u16();
        let retry_after_ms = retry_after_ms(resp.headers());
        let body_text = resp.text().await.unwrap_or_default();

        match status_code {
            404 => Err(HttpError::NotFound(body_text)),
            408 => Err(HttpError::Timeout),
            429 => Err(HttpError::RateLimited { retry_after_ms }),
            400..=499 => Err(HttpError::BadRequest(body_text)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}

// ── URL builders ─────────────────────────────────────────────────────────────

fn markets_url(base_url: &str, vs_currency: &str, page: u32, per_page: u32) -> String {
    format!(
        "{}/coins/markets?vs_currency={}&order=market_cap_desc&per_page={}&page={}&sparkline=false&price_change_percentage=24h",
        base_url,
        urlencoding::encode(vs_currency),
        per_page,
        page
    )
}

fn coin_url(base_url: &str, id: &str) -> String {
    format!(
        "{}/coins/{}?localization=false&tickers=false&market_data=true&community_data=false&developer_data=false&sparkline=false",
        base_url,
        urlencoding::encode(id)
    )
}

/// Hourly samples for a one-day window, daily otherwise.
fn chart_url(base_url: &str, id: &str, vs_currency: &str, window: HistoryWindow) -> String {
    format!(
        "{}/coins/{}/market_chart?vs_currency={}&days={}&interval={}",
        base_url,
        urlencoding::encode(id),
        urlencoding::encode(vs_currency),
        window.days(),
        window.interval().as_str()
    )
}

fn search_url(base_url: &str, query: &str) -> String {
    format!("{}/search?query={}", base_url, urlencoding::encode(query))
}

/// `Retry-After` in milliseconds, when given as whole seconds.
fn retry_after_ms(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.saturating_mul(1000))
}
