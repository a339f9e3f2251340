//! Runtime engines: periodic refresh, the market list, and the detail view.
//!
//! Engines own their state and publish it on `tokio::sync::watch` channels.
//! They only talk to the API through [`MarketSource`](crate::source::MarketSource).

pub mod detail;
pub mod list;
pub mod scheduler;

pub use detail::{DetailEngine, DetailState};
pub use list::{ListConfig, ListEngine, ListView};
pub use scheduler::{ApplyOrder, Phase, RefreshScheduler, Refreshed};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::coin::test_support::entry;
    use crate::domain::coin::{CoinLinks, DetailRecord, MarketEntry, Page};
    use crate::domain::price_history::{HistorySeries, PricePoint};
    use crate::error::{HttpError, SdkError};
    use crate::shared::{CoinId, HistoryWindow};
    use crate::source::MarketSource;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::collections::{BTreeMap, VecDeque};
    use std::sync::Mutex;
    use std::time::Duration;

    /// One scripted response: delay before answering, then the outcome.
    /// `Err` carries the HTTP status to fail with.
    pub type Step<T> = (u64, Result<T, u16>);

    /// In-memory `MarketSource` answering from per-operation scripts.
    ///
    /// When a script runs dry, lists answer with [`ScriptedSource::default_page`],
    /// details and histories with a small synthetic record.
    #[derive(Default)]
    pub struct ScriptedSource {
        pages: Mutex<VecDeque<Step<Vec<MarketEntry>>>>,
        details: Mutex<VecDeque<Step<()>>>,
        histories: Mutex<VecDeque<Step<()>>>,
        pub list_calls: Mutex<Vec<(u32, u32)>>,
        pub detail_calls: Mutex<Vec<CoinId>>,
        pub history_calls: Mutex<Vec<(CoinId, HistoryWindow)>>,
    }

    impl ScriptedSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_page(&self, delay_ms: u64, outcome: Result<Vec<MarketEntry>, u16>) -> &Self {
            self.pages.lock().unwrap().push_back((delay_ms, outcome));
            self
        }

        pub fn push_detail(&self, delay_ms: u64, outcome: Result<(), u16>) -> &Self {
            self.details.lock().unwrap().push_back((delay_ms, outcome));
            self
        }

        pub fn push_history(&self, delay_ms: u64, outcome: Result<(), u16>) -> &Self {
            self.histories.lock().unwrap().push_back((delay_ms, outcome));
            self
        }

        pub fn list_count(&self) -> usize {
            self.list_calls.lock().unwrap().len()
        }

        pub fn detail_count(&self) -> usize {
            self.detail_calls.lock().unwrap().len()
        }

        pub fn history_windows(&self) -> Vec<HistoryWindow> {
            self.history_calls.lock().unwrap().iter().map(|(_, w)| *w).collect()
        }

        pub fn default_page() -> Vec<MarketEntry> {
            (0..3)
                .map(|i| entry(&format!("coin-{i}"), &format!("c{i}"), Some(i + 1)))
                .collect()
        }

        fn next<T>(queue: &Mutex<VecDeque<Step<T>>>) -> Option<Step<T>> {
            queue.lock().unwrap().pop_front()
        }
    }

    pub fn server_error(status: u16) -> SdkError {
        SdkError::Http(HttpError::ServerError {
            status,
            body: "scripted failure".into(),
        })
    }

    pub fn detail_for(id: &CoinId) -> DetailRecord {
        DetailRecord {
            entry: entry(id.as_str(), id.as_str(), Some(1)),
            description: format!("About {id}"),
            links: CoinLinks::default(),
            prices: BTreeMap::from([("usd".to_string(), 1.0)]),
            price_change_percentage_7d: None,
            price_change_percentage_30d: None,
        }
    }

    pub fn history_for(id: &CoinId, window: HistoryWindow) -> HistorySeries {
        let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        HistorySeries {
            coin: id.clone(),
            window,
            points: (0..window.days().min(5) + 1)
                .map(|i| PricePoint {
                    time: start + chrono::Duration::days(i64::from(i)),
                    price: 1.0 + f64::from(i),
                })
                .collect(),
        }
    }

    async fn answer<T>(step: Option<Step<T>>, fallback: impl FnOnce() -> T) -> Result<T, SdkError> {
        let (delay, outcome) = match step {
            Some((delay, outcome)) => (delay, outcome.map(Some)),
            None => (0, Ok(None)),
        };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        match outcome {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Ok(fallback()),
            Err(status) => Err(server_error(status)),
        }
    }

    #[async_trait]
    impl MarketSource for ScriptedSource {
        async fn list_markets(&self, page: u32, per_page: u32) -> Result<Page, SdkError> {
            self.list_calls.lock().unwrap().push((page, per_page));
            let step = Self::next(&self.pages);
            let entries = answer(step, Self::default_page).await?;
            Ok(Page::new(page, per_page, entries))
        }

        async fn get_detail(&self, id: &CoinId) -> Result<DetailRecord, SdkError> {
            self.detail_calls.lock().unwrap().push(id.clone());
            let step = Self::next(&self.details);
            answer(step, || ()).await?;
            Ok(detail_for(id))
        }

        async fn get_history(
            &self,
            id: &CoinId,
            window: HistoryWindow,
        ) -> Result<HistorySeries, SdkError> {
            self.history_calls.lock().unwrap().push((id.clone(), window));
            let step = Self::next(&self.histories);
            answer(step, || ()).await?;
            Ok(history_for(id, window))
        }
    }
}
