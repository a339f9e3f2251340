//! Refresh scheduler — fetch now, then again on every interval tick.
//!
//! The scheduler owns a background tokio task that only produces ticks. Each
//! tick spawns an independent fetch, so a slow request never delays the next
//! one. Results are applied to a `watch` channel that presenters subscribe to.
//!
//! State transitions: `Idle → Loading → Ready`, `Ready → Loading` on every tick,
//! and any state → `Failed` on a fetch error. `Failed` keeps the last good
//! data (stale-but-visible).

use crate::error::SdkError;
use chrono::{DateTime, Utc};
use futures_util::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

// ─── Phase ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    /// Last fetch failed; any previously held data is still there.
    Failed,
}

// ─── ApplyOrder ──────────────────────────────────────────────────────────────

/// How overlapping fetch results are reconciled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApplyOrder {
    /// Results carry the sequence number of their request; one older than the
    /// newest applied result is discarded.
    #[default]
    LatestIssued,
    /// Whatever completes last wins, even if it was requested earlier.
    CompletionOrder,
}

// ─── Refreshed ───────────────────────────────────────────────────────────────

/// Published scheduler state.
#[derive(Debug, Clone)]
pub struct Refreshed<T> {
    pub data: Option<T>,
    pub phase: Phase,
    pub error: Option<String>,
    /// Fetches issued in this activation and not yet landed.
    pub in_flight: usize,
    /// Sequence number of the newest issued fetch.
    pub issued: u64,
    /// Sequence number of the result currently held.
    pub applied: u64,
    pub updated_at: Option<DateTime<Utc>>,
    generation: u64,
}

impl<T> Default for Refreshed<T> {
    fn default() -> Self {
        Self {
            data: None,
            phase: Phase::Idle,
            error: None,
            in_flight: 0,
            issued: 0,
            applied: 0,
            updated_at: None,
            generation: 0,
        }
    }
}

impl<T> Refreshed<T> {
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Data is held but the most recent fetch failed.
    pub fn is_stale(&self) -> bool {
        self.phase == Phase::Failed && self.data.is_some()
    }

    fn settled_phase(&self) -> Phase {
        if self.error.is_some() {
            Phase::Failed
        } else if self.data.is_some() {
            Phase::Ready
        } else {
            Phase::Idle
        }
    }
}

// ─── RefreshScheduler ────────────────────────────────────────────────────────

type FetchFn<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, SdkError>> + Send + Sync>;
type StateTx<T> = Arc<watch::Sender<Refreshed<T>>>;

struct Activation<T> {
    generation: u64,
    fetch: FetchFn<T>,
    ticker: JoinHandle<()>,
}

/// Periodic fetcher with an explicit start/stop lifecycle.
///
/// Must be started from within a tokio runtime. Time comes from `tokio::time`,
/// so tests drive it with a paused clock.
pub struct RefreshScheduler<T> {
    interval: Duration,
    apply_order: ApplyOrder,
    state: StateTx<T>,
    active: Option<Activation<T>>,
}

impl<T: Clone + Send + Sync + 'static> RefreshScheduler<T> {
    pub fn new(interval: Duration, apply_order: ApplyOrder) -> Self {
        let (tx, _rx) = watch::channel(Refreshed::default());
        Self {
            interval,
            apply_order,
            state: Arc::new(tx),
            active: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn apply_order(&self) -> ApplyOrder {
        self.apply_order
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Activate: fetch immediately, then once per interval until [`stop`](Self::stop).
    ///
    /// An already active scheduler is stopped first; its in-flight results
    /// will be ignored.
    pub fn start<F, Fut>(&mut self, fetch: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, SdkError>> + Send + 'static,
    {
        self.stop();

        let fetch: FetchFn<T> = Arc::new(move || fetch().boxed());
        let mut generation = 0;
        self.state.send_modify(|s| {
            s.generation += 1;
            generation = s.generation;
        });

        issue(&self.state, &fetch, generation, self.apply_order);

        let ticker = tokio::spawn(run_ticks(
            Arc::clone(&self.state),
            Arc::clone(&fetch),
            generation,
            self.interval,
            self.apply_order,
        ));

        tracing::info!(
            generation,
            interval_ms = self.interval.as_millis() as u64,
            "Refresh scheduler started"
        );
        self.active = Some(Activation {
            generation,
            fetch,
            ticker,
        });
    }

    /// Deactivate: no further fetches are scheduled and results of requests
    /// still in flight are dropped when they land. Sockets are not aborted.
    pub fn stop(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        active.ticker.abort();
        self.state.send_modify(|s| {
            s.generation += 1;
            s.in_flight = 0;
            if s.phase == Phase::Loading {
                s.phase = s.settled_phase();
            }
        });
        tracing::info!(generation = active.generation, "Refresh scheduler stopped");
    }

    /// Issue one extra fetch without resetting the interval.
    ///
    /// Returns `false` when the scheduler is not active.
    pub fn refresh_now(&self) -> bool {
        match &self.active {
            Some(active) => {
                issue(&self.state, &active.fetch, active.generation, self.apply_order);
                true
            }
            None => false,
        }
    }

    /// Drop held data and error. In-flight results of the current activation
    /// still apply when they land.
    pub fn clear(&self) {
        self.state.send_modify(|s| {
            s.data = None;
            s.error = None;
            s.updated_at = None;
            s.phase = if s.in_flight > 0 {
                Phase::Loading
            } else {
                Phase::Idle
            };
        });
    }

    /// Current state, cloned.
    pub fn snapshot(&self) -> Refreshed<T> {
        self.state.borrow().clone()
    }

    /// Change notifications for presenters.
    pub fn subscribe(&self) -> watch::Receiver<Refreshed<T>> {
        self.state.subscribe()
    }
}

impl<T> Drop for RefreshScheduler<T> {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.ticker.abort();
        }
    }
}

// ─── Background task ─────────────────────────────────────────────────────────

async fn run_ticks<T: Clone + Send + Sync + 'static>(
    state: StateTx<T>,
    fetch: FetchFn<T>,
    generation: u64,
    period: Duration,
    order: ApplyOrder,
) {
    // The immediate fetch was issued by `start`; the first tick is one period out.
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        tracing::debug!(generation, "Refresh tick");
        if !issue(&state, &fetch, generation, order) {
            return;
        }
    }
}

/// Issue one fetch for `generation`. Returns `false` if that activation is over.
fn issue<T: Clone + Send + Sync + 'static>(
    state: &StateTx<T>,
    fetch: &FetchFn<T>,
    generation: u64,
    order: ApplyOrder,
) -> bool {
    let mut seq = None;
    state.send_if_modified(|s| {
        if s.generation != generation {
            return false;
        }
        s.issued += 1;
        s.in_flight += 1;
        s.phase = Phase::Loading;
        seq = Some(s.issued);
        true
    });
    let Some(seq) = seq else {
        return false;
    };

    let request = fetch();
    let state = Arc::clone(state);
    tokio::spawn(async move {
        let result = request.await;
        state.send_if_modified(|s| apply(s, generation, seq, order, result));
    });
    true
}

fn apply<T>(
    s: &mut Refreshed<T>,
    generation: u64,
    seq: u64,
    order: ApplyOrder,
    result: Result<T, SdkError>,
) -> bool {
    if s.generation != generation {
        tracing::debug!(seq, "Dropping result of a deactivated refresh");
        return false;
    }
    s.in_flight = s.in_flight.saturating_sub(1);

    if order == ApplyOrder::LatestIssued && seq < s.applied {
        tracing::debug!(seq, applied = s.applied, "Discarding superseded refresh result");
        if s.in_flight == 0 {
            s.phase = s.settled_phase();
        }
        return true;
    }

    match result {
        Ok(data) => {
            s.data = Some(data);
            s.error = None;
            s.phase = Phase::Ready;
            s.updated_at = Some(Utc::now());
        }
        Err(err) => {
            tracing::warn!(seq, stale = s.data.is_some(), "Refresh failed: {}", err);
            s.error = Some(err.to_string());
            s.phase = Phase::Failed;
        }
    }
    s.applied = seq;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpError;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::time::sleep;

    /// Scripted fetch: each call pops `(delay, outcome)`; an empty script yields `Ok("default")`.
    #[derive(Clone)]
    struct Script {
        steps: Arc<Mutex<VecDeque<(u64, Result<&'static str, u16>)>>>,
        calls: Arc<Mutex<usize>>,
    }

    impl Script {
        fn new(steps: Vec<(u64, Result<&'static str, u16>)>) -> Self {
            Self {
                steps: Arc::new(Mutex::new(steps.into())),
                calls: Arc::new(Mutex::new(0)),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }

        fn fetcher(
            &self,
        ) -> impl Fn() -> BoxFuture<'static, Result<String, SdkError>> + Send + Sync + 'static
        {
            let script = self.clone();
            move || {
                let script = script.clone();
                async move {
                    *script.calls.lock().unwrap() += 1;
                    let step = script.steps.lock().unwrap().pop_front();
                    let (delay, outcome) = step.unwrap_or((0, Ok("default")));
                    sleep(Duration::from_millis(delay)).await;
                    outcome.map(str::to_string).map_err(|status| {
                        SdkError::Http(HttpError::ServerError {
                            status,
                            body: "unavailable".into(),
                        })
                    })
                }
                .boxed()
            }
        }
    }

    fn scheduler(order: ApplyOrder) -> RefreshScheduler<String> {
        RefreshScheduler::new(Duration::from_secs(30), order)
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_fetches_immediately() {
        let script = Script::new(vec![(10, Ok("X"))]);
        let mut sched = scheduler(ApplyOrder::LatestIssued);
        assert_eq!(sched.snapshot().phase, Phase::Idle);

        sched.start(script.fetcher());
        assert_eq!(sched.snapshot().phase, Phase::Loading);

        sleep(Duration::from_millis(20)).await;
        let state = sched.snapshot();
        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.data.as_deref(), Some("X"));
        assert_eq!(script.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_every_interval() {
        let script = Script::new(vec![]);
        let mut sched = scheduler(ApplyOrder::LatestIssued);
        sched.start(script.fetcher());

        sleep(Duration::from_secs(29)).await;
        assert_eq!(script.calls(), 1);
        sleep(Duration::from_secs(2)).await;
        assert_eq!(script.calls(), 2);
        sleep(Duration::from_secs(30)).await;
        assert_eq!(script.calls(), 3);
        assert_eq!(sched.snapshot().issued, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_future_ticks() {
        let script = Script::new(vec![]);
        let mut sched = scheduler(ApplyOrder::LatestIssued);
        sched.start(script.fetcher());
        sleep(Duration::from_secs(1)).await;
        sched.stop();
        assert!(!sched.is_active());

        sleep(Duration::from_secs(120)).await;
        assert_eq!(script.calls(), 1);
        assert!(!sched.refresh_now());
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_after_stop_is_ignored() {
        let script = Script::new(vec![(100, Ok("late"))]);
        let mut sched = scheduler(ApplyOrder::LatestIssued);
        sched.start(script.fetcher());
        sleep(Duration::from_millis(10)).await;
        sched.stop();

        sleep(Duration::from_millis(200)).await;
        let state = sched.snapshot();
        assert!(state.data.is_none());
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(script.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_stale_data() {
        let script = Script::new(vec![(0, Ok("X")), (0, Err(503))]);
        let mut sched = scheduler(ApplyOrder::LatestIssued);
        sched.start(script.fetcher());
        sleep(Duration::from_secs(1)).await;
        assert_eq!(sched.snapshot().phase, Phase::Ready);

        sleep(Duration::from_secs(30)).await;
        let state = sched.snapshot();
        assert_eq!(state.phase, Phase::Failed);
        assert!(state.is_stale());
        assert_eq!(state.data.as_deref(), Some("X"));
        assert!(state.error.as_deref().unwrap_or_default().contains("503"));

        // Next tick succeeds and clears the error.
        sleep(Duration::from_secs(30)).await;
        let state = sched.snapshot();
        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.data.as_deref(), Some("default"));
        assert!(state.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_without_data() {
        let script = Script::new(vec![(0, Err(500))]);
        let mut sched = scheduler(ApplyOrder::LatestIssued);
        sched.start(script.fetcher());
        sleep(Duration::from_secs(1)).await;
        let state = sched.snapshot();
        assert_eq!(state.phase, Phase::Failed);
        assert!(!state.is_stale());
        assert!(state.data.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_race_latest_issued_wins() {
        // A is issued first and lands at 100ms; B is issued second and lands at 50ms.
        let script = Script::new(vec![(100, Ok("X")), (50, Ok("Y"))]);
        let mut sched = scheduler(ApplyOrder::LatestIssued);
        sched.start(script.fetcher());
        assert!(sched.refresh_now());

        sleep(Duration::from_millis(75)).await;
        assert_eq!(sched.snapshot().data.as_deref(), Some("Y"));

        sleep(Duration::from_millis(50)).await;
        let state = sched.snapshot();
        assert_eq!(state.data.as_deref(), Some("Y"));
        assert_eq!(state.applied, 2);
        assert_eq!(state.in_flight, 0);
        assert_eq!(state.phase, Phase::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_race_completion_order_overwrites_newer() {
        let script = Script::new(vec![(100, Ok("X")), (50, Ok("Y"))]);
        let mut sched = scheduler(ApplyOrder::CompletionOrder);
        sched.start(script.fetcher());
        sched.refresh_now();

        sleep(Duration::from_millis(75)).await;
        assert_eq!(sched.snapshot().data.as_deref(), Some("Y"));

        sleep(Duration::from_millis(50)).await;
        let state = sched.snapshot();
        assert_eq!(state.data.as_deref(), Some("X"));
        assert_eq!(state.applied, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_error_is_discarded() {
        let script = Script::new(vec![(100, Err(502)), (10, Ok("Y"))]);
        let mut sched = scheduler(ApplyOrder::LatestIssued);
        sched.start(script.fetcher());
        sched.refresh_now();

        sleep(Duration::from_millis(200)).await;
        let state = sched.snapshot();
        assert_eq!(state.phase, Phase::Ready);
        assert!(state.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_ignores_previous_activation() {
        let script = Script::new(vec![(100, Ok("old")), (10, Ok("new"))]);
        let mut sched = scheduler(ApplyOrder::CompletionOrder);
        sched.start(script.fetcher());
        sched.start(script.fetcher());

        sleep(Duration::from_millis(200)).await;
        assert_eq!(sched.snapshot().data.as_deref(), Some("new"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_updates() {
        let script = Script::new(vec![(10, Ok("X"))]);
        let mut sched = scheduler(ApplyOrder::LatestIssued);
        let mut rx = sched.subscribe();
        sched.start(script.fetcher());

        let state = rx.wait_for(|s| s.phase == Phase::Ready).await.unwrap().clone();
        assert_eq!(state.data.as_deref(), Some("X"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_drops_data() {
        let script = Script::new(vec![]);
        let mut sched = scheduler(ApplyOrder::LatestIssued);
        sched.start(script.fetcher());
        sleep(Duration::from_millis(1)).await;
        sched.clear();
        let state = sched.snapshot();
        assert!(state.data.is_none());
        assert_eq!(state.phase, Phase::Idle);
    }
}
