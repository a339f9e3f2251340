//! Coin domain — market listing entries, listing pages, coin detail records.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

use crate::shared::{finite, CoinId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ─── MarketEntry ─────────────────────────────────────────────────────────────

/// One tradable asset snapshot from the markets listing.
///
/// Immutable once received. Numeric fields are `None` when the API sent
/// `null`, omitted them, or sent something that is not a finite number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEntry {
    pub id: CoinId,
    pub symbol: String,
    pub name: String,
    pub image: String,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub market_cap_rank: Option<u32>,
    pub price_change_percentage_24h: Option<f64>,
    pub total_volume: Option<f64>,
    pub high_24h: Option<f64>,
    pub low_24h: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub max_supply: Option<f64>,
    pub ath: Option<f64>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl MarketEntry {
    /// 24h change in percent, only when present and finite.
    pub fn change_24h(&self) -> Option<f64> {
        finite(self.price_change_percentage_24h)
    }

    /// Market capitalization, only when present, finite and non-negative.
    pub fn capitalization(&self) -> Option<f64> {
        finite(self.market_cap).filter(|cap| *cap >= 0.0)
    }

    /// Server-provided rank; zero is treated as absent.
    pub fn rank(&self) -> Option<u32> {
        self.market_cap_rank.filter(|r| *r > 0)
    }

    /// Case-insensitive symbol comparison.
    pub fn symbol_is(&self, symbol: &str) -> bool {
        self.symbol.to_lowercase() == symbol.to_lowercase()
    }
}

// ─── Page ────────────────────────────────────────────────────────────────────

/// One fetched listing page, in the server's ranking order.
///
/// A refresh replaces the whole page; entries are never merged or patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page index.
    pub page: u32,
    pub per_page: u32,
    pub entries: Vec<MarketEntry>,
    pub fetched_at: DateTime<Utc>,
}

impl Page {
    pub fn new(page: u32, per_page: u32, entries: Vec<MarketEntry>) -> Self {
        Self {
            page,
            per_page,
            entries,
            fetched_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_first(&self) -> bool {
        self.page == 1
    }
}

// ─── DetailRecord ────────────────────────────────────────────────────────────

/// Project links shown in the detail view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoinLinks {
    pub homepage: Vec<String>,
    pub blockchain_sites: Vec<String>,
}

impl CoinLinks {
    pub fn primary_homepage(&self) -> Option<&str> {
        self.homepage.first().map(String::as_str)
    }
}

/// Full record for one coin, fetched per detail session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    /// Market snapshot in the configured quote currency.
    pub entry: MarketEntry,
    /// Long-form English description (may contain HTML).
    pub description: String,
    pub links: CoinLinks,
    /// Current price keyed by lowercase currency code.
    pub prices: BTreeMap<String, f64>,
    pub price_change_percentage_7d: Option<f64>,
    pub price_change_percentage_30d: Option<f64>,
}

impl DetailRecord {
    pub fn id(&self) -> &CoinId {
        &self.entry.id
    }

    /// Current price in a given currency (case-insensitive code).
    pub fn price_in(&self, currency: &str) -> Option<f64> {
        finite(self.prices.get(&currency.to_lowercase()).copied())
    }
}

// ─── SearchHit ───────────────────────────────────────────────────────────────

/// Result row from the coin search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: CoinId,
    pub name: String,
    pub symbol: String,
    pub market_cap_rank: Option<u32>,
    pub thumb: Option<String>,
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    MissingId,
    MissingSymbol(String),
    MissingName(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingId => write!(f, "Missing coin id"),
            ValidationError::MissingSymbol(id) => write!(f, "Missing symbol ({id})"),
            ValidationError::MissingName(id) => write!(f, "Missing name ({id})"),
        }
    }
}

impl std::error::Error for ValidationError {}


#[cfg(test)]
mod tests {
    use super::test_support::*;

    #[test]
    fn test_change_filters_nan() {
        let e = entry_with("a", "a", None, Some(f64::NAN));
        assert_eq!(e.change_24h(), None);
        let e = entry_with("b", "b", None, Some(-2.0));
        assert_eq!(e.change_24h(), Some(-2.0));
    }

    #[test]
    fn test_capitalization_rejects_negative() {
        assert_eq!(entry_with("a", "a", Some(-1.0), None).capitalization(), None);
        assert_eq!(entry_with("a", "a", Some(5.0), None).capitalization(), Some(5.0));
    }

    #[test]
    fn test_zero_rank_is_absent() {
        assert_eq!(entry("a", "a", Some(0)).rank(), None);
        assert_eq!(entry("a", "a", Some(3)).rank(), Some(3));
    }

    #[test]
    fn test_symbol_is_case_insensitive() {
        assert!(entry("vanar-chain", "VANRY", None).symbol_is("vanry"));
        assert!(!entry("bitcoin", "btc", None).symbol_is("eth"));
    }
}
