//! HTTP client layer — `GeckoHttp` with an optional retry policy.

pub mod client;
pub mod retry;

pub use client::GeckoHttp;
pub use retry::{RetryConfig, RetryPolicy};
