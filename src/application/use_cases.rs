use super::request_sequencer::RequestTicket;
use super::state::DashboardState;
use crate::domain::events::DashboardEvent;
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{AssetId, ChartDataSource, MarketDataSource};
use crate::log_info;
use std::cell::RefCell;
use std::rc::Rc;

/// Use Case: replace the snapshot with a fresh fetch
#[derive(Clone)]
pub struct RefreshSnapshotUseCase {
    state: Rc<RefCell<DashboardState>>,
    source: Rc<dyn MarketDataSource>,
}

impl RefreshSnapshotUseCase {
    pub fn new(state: Rc<RefCell<DashboardState>>, source: Rc<dyn MarketDataSource>) -> Self {
        Self { state, source }
    }

    /// Marks the table as loading and issues the ticket for this refresh.
    /// Must run when the refresh is triggered, not when its future is polled.
    pub fn begin(&self) -> RequestTicket {
        self.state.borrow_mut().begin_snapshot_fetch()
    }

    /// Returns None when a newer refresh (or teardown) superseded this one.
    pub async fn execute(&self, ticket: RequestTicket) -> Option<DashboardEvent> {
        let result = self.source.fetch_snapshot().await;
        let event = self.state.borrow_mut().finish_snapshot_fetch(ticket, result);

        if let Some(DashboardEvent::SnapshotLoaded { asset_count }) = &event {
            log_info!(
                LogComponent::Application("RefreshSnapshot"),
                "Snapshot #{} applied: {} assets",
                ticket.value(),
                asset_count
            );
        }
        event
    }
}

/// Use Case: load the chart series for the selected asset
#[derive(Clone)]
pub struct LoadPriceSeriesUseCase {
    state: Rc<RefCell<DashboardState>>,
    source: Rc<dyn ChartDataSource>,
    window_days: u32,
}

impl LoadPriceSeriesUseCase {
    pub fn new(
        state: Rc<RefCell<DashboardState>>,
        source: Rc<dyn ChartDataSource>,
        window_days: u32,
    ) -> Self {
        Self {
            state,
            source,
            window_days,
        }
    }

    /// Captures the current selection and issues its ticket.
    pub fn begin(&self) -> (RequestTicket, AssetId) {
        self.state.borrow_mut().begin_series_fetch()
    }

    pub async fn execute(&self, ticket: RequestTicket, asset_id: AssetId) -> Option<DashboardEvent> {
        let result = self.source.fetch_series(&asset_id, self.window_days).await;
        self.state.borrow_mut().finish_series_fetch(ticket, result)
    }
}
