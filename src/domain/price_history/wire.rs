//! Wire types for price history (REST `market_chart`).

use serde::{Deserialize, Serialize};

/// A `[timestamp_millis, value]` pair. Either side may be `null`.
pub type RawSample = (Option<f64>, Option<f64>);

/// REST response for `/coins/{id}/market_chart`.
///
/// The endpoint also returns `market_caps` and `total_volumes`; only the
/// price samples are read.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MarketChartResponse {
    #[serde(default)]
    pub prices: Vec<RawSample>,
}
