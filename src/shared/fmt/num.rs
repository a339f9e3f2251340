//! Number formatting utilities for human-readable display.
//!
//! Every formatter takes an `Option<f64>` and renders [`NOT_AVAILABLE`] for a
//! missing, NaN or infinite input. Nothing here panics.

use crate::shared::finite;

/// Display sentinel for values that are missing or not a number.
pub const NOT_AVAILABLE: &str = "N/A";

const TRILLION: f64 = 1e12;
const BILLION: f64 = 1e9;
const MILLION: f64 = 1e6;

/// Adds thousands separators to the integer part of an already formatted number.
pub fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Trims trailing zeros, adds thousands separators.
pub fn display_formatted_string(formatted: String) -> String {
    let trimmed = if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    };
    group_thousands(&trimmed)
}

/// Format an f64 with at most `decimals` fraction digits, grouped, zeros trimmed.
pub fn display_with_decimals(amount: f64, decimals: usize) -> String {
    display_formatted_string(format!("{:.1$}", amount, decimals))
}

/// Price in dollars with precision that depends on magnitude.
///
/// Below one cent: six decimals. Below one dollar: four decimals. Otherwise two
/// decimals with thousands separators.
pub fn format_price(price: Option<f64>) -> String {
    let Some(price) = finite(price) else {
        return NOT_AVAILABLE.to_string();
    };

    if price < 0.01 {
        format!("${:.6}", price)
    } else if price < 1.0 {
        format!("${:.4}", price)
    } else {
        format!("${}", group_thousands(&format!("{:.2}", price)))
    }
}

/// Market capitalization abbreviated with T/B/M suffixes.
pub fn format_market_cap(market_cap: Option<f64>) -> String {
    let Some(cap) = finite(market_cap) else {
        return NOT_AVAILABLE.to_string();
    };

    if cap >= TRILLION {
        format!("${:.2}T", cap / TRILLION)
    } else if cap >= BILLION {
        format!("${:.2}B", cap / BILLION)
    } else if cap >= MILLION {
        format!("${:.2}M", cap / MILLION)
    } else {
        format!("${}", display_with_decimals(cap, 3))
    }
}

/// Full dollar amount with separators (detail view).
pub fn format_usd(amount: Option<f64>) -> String {
    match finite(amount) {
        Some(v) => format!("${}", display_with_decimals(v, 3)),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Signed percentage change with two decimals, e.g. `+1.23%`.
pub fn format_change(change_pct: Option<f64>) -> String {
    match finite(change_pct) {
        Some(v) if v > 0.0 => format!("+{:.2}%", v),
        Some(v) => format!("{:.2}%", v),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Token supply as a grouped whole number.
pub fn format_supply(supply: Option<f64>) -> String {
    match finite(supply) {
        Some(v) => display_with_decimals(v, 0),
        None => NOT_AVAILABLE.to_string(),
    }
}
