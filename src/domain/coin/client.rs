//! Coins sub-client.

use crate::client::CoinwatchClient;
use crate::domain::coin::{convert, DetailRecord, Page, SearchHit};
use crate::error::SdkError;
use crate::shared::CoinId;
use crate::source::{validate_coin_id, validate_page};

/// Sub-client for coin operations.
pub struct Coins<'a> {
    pub(crate) client: &'a CoinwatchClient,
}

impl<'a> Coins<'a> {
    /// One page of the market listing, ranked by market cap.
    pub async fn list(&self, page: u32, per_page: u32) -> Result<Page, SdkError> {
        validate_page(page, per_page)?;
        let rows = self
            .client
            .http
            .get_markets(&self.client.vs_currency, page, per_page)
            .await?;
        Ok(Page::new(page, per_page, convert::entries_from_wire(rows)))
    }

    /// Full record for one coin.
    pub async fn get(&self, id: &CoinId) -> Result<DetailRecord, SdkError> {
        validate_coin_id(id)?;
        let resp = self.client.http.get_coin(id.as_str()).await?;
        DetailRecord::from_wire(resp, &self.client.vs_currency)
            .map_err(|e| SdkError::Validation(e.to_string()))
    }

    /// Free-text coin search. A blank query returns no hits without a request.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SdkError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let resp = self.client.http.search(query).await?;
        Ok(resp.coins.into_iter().map(SearchHit::from).collect())
    }
}
