//! Price history sub-client — chart queries.

use crate::client::CoinwatchClient;
use crate::domain::price_history::HistorySeries;
use crate::error::SdkError;
use crate::shared::{CoinId, HistoryWindow};
use crate::source::validate_coin_id;

/// Sub-client for price history operations.
pub struct PriceHistoryClient<'a> {
    pub(crate) client: &'a CoinwatchClient,
}

impl<'a> PriceHistoryClient<'a> {
    /// Price samples for `id` over `window`, hourly for one day, daily otherwise.
    pub async fn get(&self, id: &CoinId, window: HistoryWindow) -> Result<HistorySeries, SdkError> {
        validate_coin_id(id)?;
        let resp = self
            .client
            .http
            .get_market_chart(id.as_str(), &self.client.vs_currency, window)
            .await?;
        Ok(HistorySeries::from_wire(id.clone(), window, resp))
    }
}
