//! Detail engine — record and price history for one selected coin.
//!
//! Opening a coin starts a session: the record and the history are fetched
//! concurrently and each is stored as soon as it lands, so one can fail while
//! the other is shown. Changing the window refetches the history only. Closing
//! ends the session and anything still in flight is discarded on arrival.

use crate::domain::coin::DetailRecord;
use crate::domain::price_history::HistorySeries;
use crate::error::SdkError;
use crate::shared::{CoinId, HistoryWindow};
use crate::source::MarketSource;
use std::sync::Arc;
use tokio::sync::watch;

/// Published detail view state.
#[derive(Debug, Clone, Default)]
pub struct DetailState {
    /// Coin of the open session, `None` when closed.
    pub coin: Option<CoinId>,
    pub window: HistoryWindow,
    pub record: Option<DetailRecord>,
    pub series: Option<HistorySeries>,
    /// True until both the record and the first history of the session have landed.
    pub loading: bool,
    pub history_loading: bool,
    pub detail_error: Option<String>,
    pub history_error: Option<String>,
    session: u64,
    history_seq: u64,
}

impl DetailState {
    pub fn is_open(&self) -> bool {
        self.coin.is_some()
    }

    /// Series for the selected window, if it has landed.
    pub fn current_series(&self) -> Option<&HistorySeries> {
        self.series.as_ref().filter(|s| s.window == self.window)
    }
}

type StateTx = Arc<watch::Sender<DetailState>>;

/// Drives [`DetailState`] for one detail view.
///
/// Methods take `&self`; the engine can be shared between tasks.
/// `open` and `set_window` spawn onto the current tokio runtime.
pub struct DetailEngine<S> {
    source: Arc<S>,
    default_window: HistoryWindow,
    state: StateTx,
}

impl<S: MarketSource + 'static> DetailEngine<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self::with_window(source, HistoryWindow::default())
    }

    /// Use `window` as the initial window of every session.
    pub fn with_window(source: Arc<S>, window: HistoryWindow) -> Self {
        let (tx, _rx) = watch::channel(DetailState {
            window,
            ..DetailState::default()
        });
        Self {
            source,
            default_window: window,
            state: Arc::new(tx),
        }
    }

    pub fn snapshot(&self) -> DetailState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.state.subscribe()
    }

    /// Open `id`, replacing any open session.
    ///
    /// The history is fetched for the currently selected window, including one
    /// chosen with [`set_window`](Self::set_window) while closed.
    pub fn open(&self, id: impl Into<CoinId>) {
        let id = id.into();
        let mut ticket = (0, 0, self.default_window);
        self.state.send_modify(|s| {
            s.session += 1;
            s.history_seq += 1;
            *s = DetailState {
                coin: Some(id.clone()),
                window: s.window,
                loading: true,
                history_loading: true,
                session: s.session,
                history_seq: s.history_seq,
                ..DetailState::default()
            };
            ticket = (s.session, s.history_seq, s.window);
        });
        let (session, seq, window) = ticket;
        tracing::info!(coin = %id, window = %window, session, "Detail opened");

        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let detail = async {
                let result = source.get_detail(&id).await;
                state.send_if_modified(|s| store_detail(s, session, result));
            };
            let history = async {
                let result = source.get_history(&id, window).await;
                state.send_if_modified(|s| store_history(s, session, seq, result));
            };
            tokio::join!(detail, history);
            state.send_if_modified(|s| {
                if s.session != session {
                    return false;
                }
                s.loading = false;
                true
            });
        });
    }

    /// Switch the history window of the open session and refetch the history.
    ///
    /// With no open session this only selects the window the next
    /// [`open`](Self::open) fetches. Returns `true` if a fetch was issued.
    pub fn set_window(&self, window: HistoryWindow) -> bool {
        let mut ticket = None;
        self.state.send_if_modified(|s| {
            let Some(coin) = s.coin.clone() else {
                let changed = s.window != window;
                s.window = window;
                return changed;
            };
            if s.window == window && s.history_error.is_none() {
                return false;
            }
            s.window = window;
            s.history_seq += 1;
            s.history_loading = true;
            s.history_error = None;
            ticket = Some((coin, s.session, s.history_seq));
            true
        });
        let Some((id, session, seq)) = ticket else {
            return false;
        };
        tracing::debug!(coin = %id, window = %window, seq, "History window changed");

        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let result = source.get_history(&id, window).await;
            state.send_if_modified(|s| store_history(s, session, seq, result));
        });
        true
    }

    /// End the session. Late results are ignored.
    pub fn close(&self) {
        let window = self.default_window;
        let mut closed = None;
        self.state.send_modify(|s| {
            closed = s.coin.take();
            *s = DetailState {
                window,
                session: s.session + 1,
                history_seq: s.history_seq,
                ..DetailState::default()
            };
        });
        if let Some(coin) = closed {
            tracing::info!(coin = %coin, "Detail closed");
        }
    }
}

fn store_detail(s: &mut DetailState, session: u64, result: Result<DetailRecord, SdkError>) -> bool {
    if s.session != session {
        tracing::debug!(session, "Dropping detail for a closed session");
        return false;
    }
    match result {
        Ok(record) => {
            s.record = Some(record);
            s.detail_error = None;
        }
        Err(err) => {
            tracing::warn!("Failed to load coin detail: {}", err);
            s.detail_error = Some(err.to_string());
        }
    }
    true
}

fn store_history(
    s: &mut DetailState,
    session: u64,
    seq: u64,
    result: Result<HistorySeries, SdkError>,
) -> bool {
    if s.session != session || s.history_seq != seq {
        tracing::debug!(session, seq, "Dropping superseded price history");
        return false;
    }
    s.history_loading = false;
    match result {
        Ok(series) => {
            s.series = Some(series);
            s.history_error = None;
        }
        Err(err) => {
            tracing::warn!(window = %s.window, "Failed to load price history: {}", err);
            s.series = None;
            s.history_error = Some(err.to_string());
        }
    }
    true
}
