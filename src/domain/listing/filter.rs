//! Listing filters: free text, 24h change class, market cap class.
//!
//! Each predicate is total over missing data: an absent or NaN figure is
//! decided explicitly, never compared as zero.

use crate::domain::coin::MarketEntry;
use serde::{Deserialize, Serialize};

/// Threshold for a "significant" 24h move, in percent.
pub const SIGNIFICANT_CHANGE_PCT: f64 = 5.0;

/// Lower bound (exclusive) of the large-cap class.
pub const LARGE_CAP_FLOOR: f64 = 10e9;

/// Lower bound (exclusive) of the mid-cap class.
pub const MID_CAP_FLOOR: f64 = 1e9;

// ─── ChangeClass ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeClass {
    #[default]
    All,
    /// Strictly positive change.
    Positive,
    /// Strictly negative change.
    Negative,
    /// Absolute change above [`SIGNIFICANT_CHANGE_PCT`].
    Significant,
}

impl ChangeClass {
    pub fn matches(&self, entry: &MarketEntry) -> bool {
        if *self == ChangeClass::All {
            return true;
        }
        let Some(change) = entry.change_24h() else {
            return false;
        };
        match self {
            ChangeClass::All => true,
            ChangeClass::Positive => change > 0.0,
            ChangeClass::Negative => change < 0.0,
            ChangeClass::Significant => change.abs() > SIGNIFICANT_CHANGE_PCT,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeClass::All => "all",
            ChangeClass::Positive => "positive",
            ChangeClass::Negative => "negative",
            ChangeClass::Significant => "significant",
        }
    }
}

// ─── CapClass ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapClass {
    #[default]
    All,
    /// Above $10B.
    Large,
    /// Above $1B, up to and including $10B.
    Mid,
    /// $1B or less, or unknown.
    Small,
}

impl CapClass {
    /// Unknown capitalization is folded into `Small`.
    pub fn matches(&self, entry: &MarketEntry) -> bool {
        let cap = entry.capitalization();
        match self {
            CapClass::All => true,
            CapClass::Large => cap.is_some_and(|c| c > LARGE_CAP_FLOOR),
            CapClass::Mid => cap.is_some_and(|c| c > MID_CAP_FLOOR && c <= LARGE_CAP_FLOOR),
            CapClass::Small => cap.map_or(true, |c| c <= MID_CAP_FLOOR),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CapClass::All => "all",
            CapClass::Large => "large",
            CapClass::Mid => "mid",
            CapClass::Small => "small",
        }
    }
}

// ─── FilterState ─────────────────────────────────────────────────────────────

/// All filter inputs of the list view. A plain value: replace it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub search: String,
    pub change: ChangeClass,
    pub cap: CapClass,
}

impl FilterState {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_change(mut self, change: ChangeClass) -> Self {
        self.change = change;
        self
    }

    pub fn with_cap(mut self, cap: CapClass) -> Self {
        self.cap = cap;
        self
    }

    /// Whether every dimension is at its match-all value.
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.change == ChangeClass::All && self.cap == CapClass::All
    }

    /// Case-insensitive substring match on name or symbol. Blank matches all.
    pub fn matches_text(&self, entry: &MarketEntry) -> bool {
        let query = self.search.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        entry.name.to_lowercase().contains(&query) || entry.symbol.to_lowercase().contains(&query)
    }

    /// Conjunction of all three predicates.
    pub fn matches(&self, entry: &MarketEntry) -> bool {
        self.matches_text(entry) && self.change.matches(entry) && self.cap.matches(entry)
    }

    /// Entries that pass, in their original relative order.
    pub fn apply<'a>(&self, entries: &'a [MarketEntry]) -> Vec<&'a MarketEntry> {
        entries.iter().filter(|e| self.matches(e)).collect()
    }
}
