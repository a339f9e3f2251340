//! Conversion: coin wire responses → domain types (TryFrom + validation).

use super::wire::{self, CurrencyMap};
use super::{CoinLinks, DetailRecord, MarketEntry, SearchHit, ValidationError};
use crate::shared::{finite, CoinId};
use std::collections::BTreeMap;

impl TryFrom<wire::CoinMarketResponse> for MarketEntry {
    type Error = ValidationError;

    fn try_from(source: wire::CoinMarketResponse) -> Result<Self, Self::Error> {
        if source.id.trim().is_empty() {
            return Err(ValidationError::MissingId);
        }
        if source.symbol.trim().is_empty() {
            return Err(ValidationError::MissingSymbol(source.id));
        }
        if source.name.trim().is_empty() {
            return Err(ValidationError::MissingName(source.id));
        }

        // The `_in_currency` variant is only present when explicitly requested.
        let change = finite(source.price_change_percentage_24h)
            .or(finite(source.price_change_percentage_24h_in_currency));

        Ok(MarketEntry {
            id: CoinId::from(source.id),
            symbol: source.symbol,
            name: source.name,
            image: source.image.unwrap_or_default(),
            current_price: finite(source.current_price),
            market_cap: finite(source.market_cap),
            market_cap_rank: source.market_cap_rank,
            price_change_percentage_24h: change,
            total_volume: finite(source.total_volume),
            high_24h: finite(source.high_24h),
            low_24h: finite(source.low_24h),
            circulating_supply: finite(source.circulating_supply),
            total_supply: finite(source.total_supply),
            max_supply: finite(source.max_supply),
            ath: finite(source.ath),
            last_updated: source.last_updated,
        })
    }
}

/// Convert a listing response, dropping malformed rows and keeping server order.
pub(crate) fn entries_from_wire(rows: Vec<wire::CoinMarketResponse>) -> Vec<MarketEntry> {
    let total = rows.len();
    let entries: Vec<MarketEntry> = rows
        .into_iter()
        .filter_map(|row| match MarketEntry::try_from(row) {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("Skipping malformed market row: {}", err);
                None
            }
        })
        .collect();
    if entries.len() < total {
        tracing::debug!(kept = entries.len(), total, "Market rows filtered");
    }
    entries
}

fn pick(map: &CurrencyMap, currency: &str) -> Option<f64> {
    finite(map.get(currency).copied().flatten())
}

fn non_empty(links: Vec<Option<String>>) -> Vec<String> {
    links
        .into_iter()
        .flatten()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

impl DetailRecord {
    /// Build a detail record, reading currency-keyed figures in `vs_currency`.
    pub fn from_wire(
        source: wire::CoinDetailResponse,
        vs_currency: &str,
    ) -> Result<Self, ValidationError> {
        if source.id.trim().is_empty() {
            return Err(ValidationError::MissingId);
        }
        if source.symbol.trim().is_empty() {
            return Err(ValidationError::MissingSymbol(source.id));
        }

        let vs = vs_currency.to_lowercase();
        let md = source.market_data.unwrap_or_default();
        let name = if source.name.trim().is_empty() {
            source.symbol.to_uppercase()
        } else {
            source.name
        };

        let entry = MarketEntry {
            id: CoinId::from(source.id),
            symbol: source.symbol,
            name,
            image: source
                .image
                .large
                .or(source.image.small)
                .or(source.image.thumb)
                .unwrap_or_default(),
            current_price: pick(&md.current_price, &vs),
            market_cap: pick(&md.market_cap, &vs),
            market_cap_rank: source.market_cap_rank.or(md.market_cap_rank),
            price_change_percentage_24h: finite(md.price_change_percentage_24h),
            total_volume: pick(&md.total_volume, &vs),
            high_24h: pick(&md.high_24h, &vs),
            low_24h: pick(&md.low_24h, &vs),
            circulating_supply: finite(md.circulating_supply),
            total_supply: finite(md.total_supply),
            max_supply: finite(md.max_supply),
            ath: pick(&md.ath, &vs),
            last_updated: md.last_updated.or(source.last_updated),
        };

        let prices: BTreeMap<String, f64> = md
            .current_price
            .iter()
            .filter_map(|(currency, price)| finite(*price).map(|p| (currency.to_lowercase(), p)))
            .collect();

        Ok(DetailRecord {
            entry,
            description: source.description.en.unwrap_or_default(),
            links: CoinLinks {
                homepage: non_empty(source.links.homepage),
                blockchain_sites: non_empty(source.links.blockchain_site),
            },
            prices,
            price_change_percentage_7d: finite(md.price_change_percentage_7d),
            price_change_percentage_30d: finite(md.price_change_percentage_30d),
        })
    }
}

impl From<wire::SearchCoinResponse> for SearchHit {
    fn from(s: wire::SearchCoinResponse) -> Self {
        Self {
            id: s.id,
            name: s.name,
            symbol: s.symbol,
            market_cap_rank: s.market_cap_rank,
            thumb: s.thumb,
        }
    }
}
