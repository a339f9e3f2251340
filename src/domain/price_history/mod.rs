//! Price history domain — chart samples for one coin over one window.

#[cfg(feature = "http")]
pub mod client;
pub mod wire;

use crate::shared::serde_util::timestamp_ms;
use crate::shared::{finite, CoinId, HistoryWindow, Interval};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single data point on a price chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub time: DateTime<Utc>,
    pub price: f64,
}

impl PricePoint {
    /// Axis label: time of day for hourly series, calendar date otherwise.
    pub fn label(&self, interval: Interval) -> String {
        match interval {
            Interval::Hourly => self.time.format("%H:%M").to_string(),
            Interval::Daily => self.time.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Ordered price samples for one coin over one requested window.
///
/// Never cached across window switches: a new window means a new series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySeries {
    pub coin: CoinId,
    pub window: HistoryWindow,
    pub points: Vec<PricePoint>,
}

impl HistorySeries {
    /// Build a series from the raw chart response, skipping unusable samples.
    pub fn from_wire(coin: CoinId, window: HistoryWindow, resp: wire::MarketChartResponse) -> Self {
        let total = resp.prices.len();
        let points: Vec<PricePoint> = resp
            .prices
            .into_iter()
            .filter_map(|(t, p)| {
                let time = timestamp_ms::from_millis(finite(t)?)?;
                Some(PricePoint {
                    time,
                    price: finite(p)?,
                })
            })
            .collect();
        if points.len() < total {
            tracing::debug!(
                coin = %coin,
                kept = points.len(),
                total,
                "Dropped unusable price samples"
            );
        }
        Self {
            coin,
            window,
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn low(&self) -> Option<f64> {
        self.points.iter().map(|p| p.price).reduce(f64::min)
    }

    pub fn high(&self) -> Option<f64> {
        self.points.iter().map(|p| p.price).reduce(f64::max)
    }

    /// Percent change from the first to the last sample.
    pub fn change_pct(&self) -> Option<f64> {
        let first = self.first()?.price;
        let last = self.last()?.price;
        if first == 0.0 {
            return None;
        }
        finite(Some((last - first) / first * 100.0))
    }

    /// `(label, price)` pairs ready for a chart widget.
    pub fn chart_data(&self) -> Vec<(String, f64)> {
        let interval = self.window.interval();
        self.points
            .iter()
            .map(|p| (p.label(interval), p.price))
            .collect()
    }
}
