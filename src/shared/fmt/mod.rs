//! Display formatting for prices, market caps, percentages and supplies.

pub mod num;

pub use num::{
    format_change, format_market_cap, format_price, format_supply, format_usd, NOT_AVAILABLE,
};
