//! List engine — one refreshed page of markets plus filter and pagination state.
//!
//! The engine holds exactly one [`Page`]: the current page. Changing the page or
//! the page size drops it, deactivates the scheduler and reactivates it for the
//! new page, so a result for the old page can never land in the new view.
//! Filters are applied locally on every [`view`](ListEngine::view) and never
//! trigger a fetch.

use crate::domain::coin::Page;
use crate::domain::listing::{
    derive_rows, CapClass, ChangeClass, FilterState, ListRow, PageCount, Pagination,
};
use crate::engine::scheduler::{ApplyOrder, Phase, RefreshScheduler, Refreshed};
use crate::network::{
    APPROX_TOTAL_COINS, DEFAULT_FEATURED_SYMBOL, DEFAULT_PER_PAGE, DEFAULT_REFRESH_INTERVAL,
};
use crate::source::MarketSource;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

// ─── ListConfig ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ListConfig {
    pub per_page: u32,
    pub refresh_interval: Duration,
    /// Symbol (or name fragment) pinned to the top of page 1. `None` disables pinning.
    pub featured_symbol: Option<String>,
    pub apply_order: ApplyOrder,
    /// Estimated number of listed coins, used for the page count.
    pub approx_total: u32,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            featured_symbol: Some(DEFAULT_FEATURED_SYMBOL.to_string()),
            apply_order: ApplyOrder::default(),
            approx_total: APPROX_TOTAL_COINS,
        }
    }
}

// ─── ListView ────────────────────────────────────────────────────────────────

/// Everything a presenter needs to draw the list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListView {
    pub rows: Vec<ListRow>,
    /// Entries on the held page before filtering.
    pub fetched: usize,
    pub loading: bool,
    /// Message of the most recent failed refresh; rows may still be present.
    pub error: Option<String>,
    pub pagination: Pagination,
    pub page_count: PageCount,
    pub filter: FilterState,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ListView {
    /// Data present but the latest refresh failed.
    pub fn is_stale(&self) -> bool {
        self.error.is_some() && self.fetched > 0
    }

    pub fn has_next(&self) -> bool {
        self.page_count.has_next(self.pagination)
    }

    pub fn has_prev(&self) -> bool {
        !self.pagination.is_first()
    }
}

// ─── ListEngine ──────────────────────────────────────────────────────────────

pub struct ListEngine<S> {
    source: Arc<S>,
    config: ListConfig,
    pagination: Pagination,
    filter: FilterState,
    scheduler: RefreshScheduler<Page>,
}

impl<S: MarketSource + 'static> ListEngine<S> {
    pub fn new(source: Arc<S>, config: ListConfig) -> Self {
        let scheduler = RefreshScheduler::new(config.refresh_interval, config.apply_order);
        Self {
            source,
            pagination: Pagination::new(1, config.per_page),
            filter: FilterState::default(),
            scheduler,
            config,
        }
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn is_active(&self) -> bool {
        self.scheduler.is_active()
    }

    // ── Lifecycle ────────────────────────────────────────────────────────

    /// Fetch the current page now and keep refreshing it. Requires a tokio runtime.
    pub fn start(&mut self) {
        let source = Arc::clone(&self.source);
        let Pagination { page, per_page } = self.pagination;
        tracing::info!(page, per_page, "List engine active");
        self.scheduler.start(move || {
            let source = Arc::clone(&source);
            async move { source.list_markets(page, per_page).await }
        });
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    /// Manual refresh. Returns `false` when the engine is stopped.
    pub fn refresh_now(&self) -> bool {
        self.scheduler.refresh_now()
    }

    // ── Filters ──────────────────────────────────────────────────────────

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.filter.search = text.into();
    }

    pub fn set_change_filter(&mut self, change: ChangeClass) {
        self.filter.change = change;
    }

    pub fn set_cap_filter(&mut self, cap: CapClass) {
        self.filter.cap = cap;
    }

    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
    }

    pub fn clear_filters(&mut self) {
        self.filter = FilterState::default();
    }

    // ── Pagination ───────────────────────────────────────────────────────

    /// Move to `page` (1-based; 0 is treated as 1).
    pub fn set_page(&mut self, page: u32) {
        self.repaginate(Pagination::new(page, self.pagination.per_page));
    }

    pub fn next_page(&mut self) {
        self.repaginate(self.pagination.next());
    }

    pub fn prev_page(&mut self) {
        self.repaginate(self.pagination.prev());
    }

    /// Change the page size; returns to page 1.
    pub fn set_per_page(&mut self, per_page: u32) {
        self.repaginate(Pagination::new(1, per_page));
    }

    fn repaginate(&mut self, next: Pagination) {
        if next == self.pagination {
            return;
        }
        tracing::debug!(
            from = self.pagination.page,
            to = next.page,
            per_page = next.per_page,
            "List page changed"
        );
        let was_active = self.scheduler.is_active();
        self.scheduler.stop();
        self.scheduler.clear();
        self.pagination = next;
        if was_active {
            self.start();
        }
    }

    // ── Output ───────────────────────────────────────────────────────────

    /// Render-ready view of the held page under the current filters.
    pub fn view(&self) -> ListView {
        self.view_of(&self.scheduler.snapshot())
    }

    /// Build a view from a state received on [`subscribe`](Self::subscribe).
    pub fn view_of(&self, state: &Refreshed<Page>) -> ListView {
        let estimate = PageCount::approximate(self.config.approx_total, self.pagination.per_page);
        let page = state
            .data
            .as_ref()
            .filter(|p| p.page == self.pagination.page && p.per_page == self.pagination.per_page);

        let (rows, fetched, page_count) = match page {
            Some(page) => (
                derive_rows(
                    page,
                    &self.filter,
                    self.pagination,
                    self.config.featured_symbol.as_deref(),
                ),
                page.len(),
                estimate.observe(self.pagination, page.len()),
            ),
            None => (Vec::new(), 0, estimate),
        };

        ListView {
            rows,
            fetched,
            loading: state.phase == Phase::Loading,
            error: state.error.clone(),
            pagination: self.pagination,
            page_count,
            filter: self.filter.clone(),
            updated_at: state.updated_at,
        }
    }

    /// Raw page state changes. Filter changes are local and not signalled here.
    pub fn subscribe(&self) -> watch::Receiver<Refreshed<Page>> {
        self.scheduler.subscribe()
    }
}
