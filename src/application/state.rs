use super::debouncer::Debouncer;
use super::request_sequencer::{RequestSequencer, RequestTicket};
use super::selection::SelectionCoordinator;
use crate::domain::dashboard::{Page, ViewControls, derive};
use crate::domain::errors::AppResult;
use crate::domain::events::DashboardEvent;
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{AssetId, PricePoint, PriceSeries, Snapshot, SortKey};
use crate::domain::preferences::PreferenceStore;
use crate::{log_debug, log_warn};

/// Loading/error flags for one independently failing view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadStatus {
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartState {
    /// Asset the series (or the pending request) belongs to
    pub asset_id: AssetId,
    pub series: PriceSeries,
    pub status: LoadStatus,
}

/// Synchronous core of the dashboard. Every mutation goes through an intent
/// method; async fetches are split into `begin_*` / `finish_*` pairs so no
/// borrow is held while a request is in flight.
pub struct DashboardState {
    snapshot: Snapshot,
    table: LoadStatus,
    controls: ViewControls,
    preferences: Box<dyn PreferenceStore>,
    selection: SelectionCoordinator,
    chart: ChartState,
    search: Debouncer<String>,
    snapshot_requests: RequestSequencer,
    series_requests: RequestSequencer,
}

impl DashboardState {
    pub fn new(
        preferences: Box<dyn PreferenceStore>,
        selection: SelectionCoordinator,
        search_debounce_ms: u64,
    ) -> Self {
        let controls = ViewControls {
            favorites: preferences.favorites().clone(),
            ..ViewControls::default()
        };
        let chart = ChartState {
            asset_id: selection.selected().clone(),
            series: PriceSeries::default(),
            status: LoadStatus::default(),
        };

        Self {
            snapshot: Snapshot::default(),
            table: LoadStatus {
                loading: true,
                error: None,
            },
            controls,
            preferences,
            selection,
            chart,
            search: Debouncer::new(search_debounce_ms),
            snapshot_requests: RequestSequencer::new(),
            series_requests: RequestSequencer::new(),
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn table_status(&self) -> &LoadStatus {
        &self.table
    }

    pub fn controls(&self) -> &ViewControls {
        &self.controls
    }

    pub fn chart(&self) -> &ChartState {
        &self.chart
    }

    pub fn selected(&self) -> &AssetId {
        self.selection.selected()
    }

    pub fn is_selected(&self, id: &AssetId) -> bool {
        self.selection.is_selected(id)
    }

    /// Derives the visible page and writes the clamped page number back.
    pub fn page(&mut self) -> Page {
        let page = derive(&self.snapshot, &self.controls);
        if page.current_page != self.controls.page {
            log_debug!(
                LogComponent::Application("DashboardState"),
                "Page {} out of range, clamped to {}",
                self.controls.page,
                page.current_page
            );
            self.controls.page = page.current_page;
        }
        page
    }

    // --- snapshot ---

    pub fn begin_snapshot_fetch(&mut self) -> RequestTicket {
        self.table.loading = true;
        self.table.error = None;
        self.snapshot_requests.issue()
    }

    /// Applies the result if `ticket` is still the latest request.
    pub fn finish_snapshot_fetch(
        &mut self,
        ticket: RequestTicket,
        result: AppResult<Snapshot>,
    ) -> Option<DashboardEvent> {
        if !self.snapshot_requests.is_current(ticket) {
            log_debug!(
                LogComponent::Application("DashboardState"),
                "Dropping stale snapshot response #{}",
                ticket.value()
            );
            return None;
        }

        self.table.loading = false;
        match result {
            Ok(snapshot) => {
                let asset_count = snapshot.len();
                self.snapshot = snapshot;
                self.table.error = None;
                Some(DashboardEvent::SnapshotLoaded { asset_count })
            }
            Err(e) => {
                log_warn!(LogComponent::Application("DashboardState"), "Snapshot failed: {e}");
                let reason = e.to_string();
                self.table.error = Some(reason.clone());
                Some(DashboardEvent::SnapshotFailed { reason })
            }
        }
    }

    // --- chart ---

    /// Starts a series request for the current selection.
    pub fn begin_series_fetch(&mut self) -> (RequestTicket, AssetId) {
        let asset_id = self.selection.selected().clone();
        self.chart = ChartState {
            asset_id: asset_id.clone(),
            series: PriceSeries::default(),
            status: LoadStatus {
                loading: true,
                error: None,
            },
        };
        (self.series_requests.issue(), asset_id)
    }

    pub fn finish_series_fetch(
        &mut self,
        ticket: RequestTicket,
        result: AppResult<Vec<PricePoint>>,
    ) -> Option<DashboardEvent> {
        if !self.series_requests.is_current(ticket) {
            log_debug!(
                LogComponent::Application("DashboardState"),
                "Dropping stale series response #{}",
                ticket.value()
            );
            return None;
        }

        let asset_id = self.chart.asset_id.clone();
        self.chart.status.loading = false;
        match result {
            Ok(points) => {
                self.chart.series = PriceSeries::new(points);
                Some(DashboardEvent::SeriesLoaded {
                    asset_id,
                    point_count: self.chart.series.len(),
                })
            }
            Err(e) => {
                log_warn!(
                    LogComponent::Application("DashboardState"),
                    "Series for {asset_id} failed: {e}"
                );
                let reason = e.to_string();
                self.chart.status.error = Some(reason.clone());
                Some(DashboardEvent::SeriesFailed { asset_id, reason })
            }
        }
    }

    // --- intents ---

    /// Records raw search text; returns the deadline at which it settles.
    pub fn set_search_text(&mut self, text: impl Into<String>, now_ms: u64) -> u64 {
        let text = text.into();
        self.controls.search_text = text.clone();
        self.search.observe(text, now_ms)
    }

    /// Promotes the pending search text once it has settled.
    pub fn settle_search(&mut self, now_ms: u64) -> Option<DashboardEvent> {
        let query = self.search.poll(now_ms)?;
        self.controls.effective_search = query.clone();
        Some(DashboardEvent::SearchSettled { query })
    }

    pub fn search_deadline(&self) -> Option<u64> {
        self.search.deadline()
    }

    pub fn set_sort_key(&mut self, sort_key: SortKey) -> DashboardEvent {
        self.controls.sort_key = sort_key;
        DashboardEvent::SortChanged { sort_key }
    }

    pub fn set_favorites_only(&mut self, enabled: bool) -> DashboardEvent {
        self.controls.favorites_only = enabled;
        DashboardEvent::FavoritesOnlyChanged { enabled }
    }

    /// Stored as requested; `page()` clamps it against the current result.
    pub fn set_page(&mut self, page: usize) -> DashboardEvent {
        self.controls.page = page;
        DashboardEvent::PageChanged { page }
    }

    pub fn next_page(&mut self) -> DashboardEvent {
        let total = self.total_pages();
        let page = self.controls.page.saturating_add(1).min(total);
        self.set_page(page)
    }

    pub fn previous_page(&mut self) -> DashboardEvent {
        let page = self.controls.page.saturating_sub(1).max(1);
        self.set_page(page)
    }

    fn total_pages(&self) -> usize {
        derive(&self.snapshot, &self.controls).total_pages
    }

    /// Flips the favorite and mirrors the persisted set into the controls.
    pub fn toggle_favorite(&mut self, asset_id: AssetId) -> DashboardEvent {
        let is_favorite = self.preferences.toggle(&asset_id);
        self.controls.favorites = self.preferences.favorites().clone();
        DashboardEvent::FavoriteToggled {
            asset_id,
            is_favorite,
        }
    }

    /// Returns None when `asset_id` was already selected.
    pub fn select(&mut self, asset_id: AssetId) -> Option<DashboardEvent> {
        if !self.selection.select(asset_id.clone()) {
            return None;
        }
        Some(DashboardEvent::SelectionChanged { asset_id })
    }

    /// Teardown: cancels pending search text and stales every in-flight request.
    pub fn dispose(&mut self) {
        self.search.cancel();
        self.snapshot_requests.invalidate();
        self.series_requests.invalidate();
        self.table.loading = false;
        self.chart.status.loading = false;
    }
}
