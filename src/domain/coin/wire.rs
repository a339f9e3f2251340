//! Wire types for coin responses (REST).
//!
//! Numeric fields go through `lenient_f64` so a `null`, a missing field, or a
//! numeric string never fails the whole payload.

use crate::shared::serde_util::lenient_f64;
use crate::shared::CoinId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-currency figures keyed by lowercase currency code.
pub type CurrencyMap = BTreeMap<String, Option<f64>>;

// ─── /coins/markets ─────────────────────────────────────────────────────────

/// One element of the `/coins/markets` array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoinMarketResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, with = "lenient_f64")]
    pub current_price: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default, with = "lenient_f64")]
    pub total_volume: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub high_24h: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub low_24h: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub price_change_percentage_24h_in_currency: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub circulating_supply: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub total_supply: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub max_supply: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub ath: Option<f64>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

// ─── /coins/{id} ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImageResponse {
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DescriptionResponse {
    #[serde(default)]
    pub en: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LinksResponse {
    #[serde(default)]
    pub homepage: Vec<Option<String>>,
    #[serde(default)]
    pub blockchain_site: Vec<Option<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MarketDataResponse {
    #[serde(default)]
    pub current_price: CurrencyMap,
    #[serde(default)]
    pub market_cap: CurrencyMap,
    #[serde(default)]
    pub total_volume: CurrencyMap,
    #[serde(default)]
    pub high_24h: CurrencyMap,
    #[serde(default)]
    pub low_24h: CurrencyMap,
    #[serde(default)]
    pub ath: CurrencyMap,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default, with = "lenient_f64")]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub price_change_percentage_7d: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub price_change_percentage_30d: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub circulating_supply: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub total_supply: Option<f64>,
    #[serde(default, with = "lenient_f64")]
    pub max_supply: Option<f64>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// REST response for `/coins/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoinDetailResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: ImageResponse,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub description: DescriptionResponse,
    #[serde(default)]
    pub links: LinksResponse,
    #[serde(default)]
    pub market_data: Option<MarketDataResponse>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

// ─── /search ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchCoinResponse {
    pub id: CoinId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub thumb: Option<String>,
}

/// REST response for `/search`. Only the coin section is consumed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    #[serde(default)]
    pub coins: Vec<SearchCoinResponse>,
}
