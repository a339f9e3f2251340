//! # Coinwatch
//!
//! Client-side engine for a cryptocurrency market dashboard: a paginated,
//! periodically refreshed market list and a per-coin detail view with price
//! history, backed by a CoinGecko-compatible REST API.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core** — Newtypes, domain models, listing derivation, formatting (always available)
//! 2. **HTTP API** — `GeckoHttp` with an opt-in retry policy
//! 3. **High-Level Client** — `CoinwatchClient` with nested sub-clients
//! 4. **Engines** — Refresh scheduler, list engine and detail engine on tokio
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use coinwatch::prelude::*;
//! use std::sync::Arc;
//!
//! let client = Arc::new(CoinwatchClient::builder().build()?);
//!
//! let mut list = ListEngine::new(Arc::clone(&client), ListConfig::default());
//! list.start();
//! list.set_change_filter(ChangeClass::Positive);
//! let view = list.view();
//!
//! let detail = DetailEngine::new(client);
//! detail.open("bitcoin");
//! detail.set_window(HistoryWindow::Day30);
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes, serde helpers and display formatting.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network constants and defaults.
pub mod network;

/// The `MarketSource` trait the engines fetch through.
pub mod source;

// ── Layer 2: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 3: High-Level Client ───────────────────────────────────────────────

/// `CoinwatchClient` — the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Layer 4: Engines ─────────────────────────────────────────────────────────

/// Refresh scheduler, list engine, detail engine.
#[cfg(feature = "engine")]
pub mod engine;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{CoinId, HistoryWindow, Interval};

    // Formatting
    pub use crate::shared::fmt::{
        format_change, format_market_cap, format_price, format_supply, format_usd, NOT_AVAILABLE,
    };

    // Domain types — coin
    pub use crate::domain::coin::{
        CoinLinks, DetailRecord, MarketEntry, Page, SearchHit, ValidationError,
    };

    // Domain types — listing
    pub use crate::domain::listing::{
        derive_rows, CapClass, ChangeClass, FilterState, ListRow, PageCount, Pagination,
    };

    // Domain types — price history
    pub use crate::domain::price_history::{HistorySeries, PricePoint};

    // Errors
    pub use crate::error::{HttpError, SdkError};

    // Network
    pub use crate::network::{DEFAULT_API_URL, DEFAULT_VS_CURRENCY};

    // Data source
    pub use crate::source::MarketSource;

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{
        CoinsClient, CoinwatchClient, CoinwatchClientBuilder, PriceHistorySubClient,
    };
    #[cfg(feature = "http")]
    pub use crate::http::retry::{RetryConfig, RetryPolicy};

    // Engines
    #[cfg(feature = "engine")]
    pub use crate::engine::{
        ApplyOrder, DetailEngine, DetailState, ListConfig, ListEngine, ListView, Phase,
        RefreshScheduler, Refreshed,
    };
}
