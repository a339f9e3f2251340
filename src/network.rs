//! Network constants for the market data API.

use std::time::Duration;

/// Default REST API base URL (CoinGecko public v3 API).
pub const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Quote currency used for prices and market caps.
pub const DEFAULT_VS_CURRENCY: &str = "usd";

/// Per-request timeout on native targets.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Interval between list refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Entries requested per listing page.
pub const DEFAULT_PER_PAGE: u32 = 50;

/// Symbol promoted to the front of the first listing page.
pub const DEFAULT_FEATURED_SYMBOL: &str = "vanry";

/// Approximate number of listed coins.
///
/// `/coins/markets` does not report a total, so page counts derived from this
/// are estimates.
pub const APPROX_TOTAL_COINS: u32 = 10_000;
