//! The seam between the engines and the market data API.
//!
//! `CoinwatchClient` implements [`MarketSource`] over HTTP; tests substitute scripted fakes.

use crate::domain::coin::{DetailRecord, Page};
use crate::domain::price_history::HistorySeries;
use crate::error::SdkError;
use crate::shared::{CoinId, HistoryWindow};
use async_trait::async_trait;
use std::sync::Arc;

/// Largest page size the markets endpoint accepts.
pub const MAX_PER_PAGE: u32 = 250;

/// The three read-only queries the engines issue.
///
/// Implementations perform no caching, retrying or rate limiting of their own
/// beyond what they are explicitly configured with.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// One listing page. `page` and `per_page` are 1-based and positive.
    async fn list_markets(&self, page: u32, per_page: u32) -> Result<Page, SdkError>;

    /// Full record for one coin.
    async fn get_detail(&self, id: &CoinId) -> Result<DetailRecord, SdkError>;

    /// Price history for one coin over one window.
    async fn get_history(
        &self,
        id: &CoinId,
        window: HistoryWindow,
    ) -> Result<HistorySeries, SdkError>;
}

#[async_trait]
impl<T: MarketSource + ?Sized> MarketSource for Arc<T> {
    async fn list_markets(&self, page: u32, per_page: u32) -> Result<Page, SdkError> {
        (**self).list_markets(page, per_page).await
    }

    async fn get_detail(&self, id: &CoinId) -> Result<DetailRecord, SdkError> {
        (**self).get_detail(id).await
    }

    async fn get_history(
        &self,
        id: &CoinId,
        window: HistoryWindow,
    ) -> Result<HistorySeries, SdkError> {
        (**self).get_history(id, window).await
    }
}

pub fn validate_page(page: u32, per_page: u32) -> Result<(), SdkError> {
    if page == 0 {
        return Err(SdkError::Validation("page must be >= 1".into()));
    }
    if per_page == 0 || per_page > MAX_PER_PAGE {
        return Err(SdkError::Validation(format!(
            "per_page must be within 1..={}",
            MAX_PER_PAGE
        )));
    }
    Ok(())
}

pub fn validate_coin_id(id: &CoinId) -> Result<(), SdkError> {
    if id.is_empty() {
        return Err(SdkError::Validation("coin id must not be empty".into()));
    }
    Ok(())
}
