use super::scheduler::{RefreshScheduler, TimerDriver, TimerHandle};
use super::selection::SelectionCoordinator;
use super::state::{ChartState, DashboardState, LoadStatus};
use super::use_cases::{LoadPriceSeriesUseCase, RefreshSnapshotUseCase};
use crate::config::DashboardSettings;
use crate::domain::dashboard::{Page, ViewControls};
use crate::domain::events::{DashboardEvent, DomainEvent, EventDispatcher, InMemoryEventDispatcher};
use crate::domain::logging::{LogComponent, TimeProvider, get_logger};
use crate::domain::market_data::{AssetId, ChartDataSource, MarketDataSource, SortKey};
use crate::domain::preferences::PreferenceStore;
use crate::log_debug;
use futures::future::LocalBoxFuture;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::Arc;

/// Runs a future on the UI thread (`spawn_local` in the browser).
pub type Spawner = Rc<dyn Fn(LocalBoxFuture<'static, ()>)>;

/// Collaborators the coordinator is wired with
pub struct DashboardServices {
    pub market: Rc<dyn MarketDataSource>,
    pub chart: Rc<dyn ChartDataSource>,
    pub preferences: Box<dyn PreferenceStore>,
    pub timers: Rc<dyn TimerDriver>,
    pub clock: Arc<dyn TimeProvider>,
    pub spawner: Spawner,
}

struct Inner {
    state: Rc<RefCell<DashboardState>>,
    refresh: RefreshSnapshotUseCase,
    series: LoadPriceSeriesUseCase,
    scheduler: RefCell<RefreshScheduler>,
    search_timer: RefCell<Option<TimerHandle>>,
    timers: Rc<dyn TimerDriver>,
    clock: Arc<dyn TimeProvider>,
    spawner: Spawner,
    events: RefCell<InMemoryEventDispatcher>,
    settings: DashboardSettings,
    mounted: Cell<bool>,
}

/// Entry point for every UI intent. Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct DashboardCoordinator {
    inner: Rc<Inner>,
}

impl DashboardCoordinator {
    pub fn new(services: DashboardServices, settings: DashboardSettings) -> Self {
        let selection = SelectionCoordinator::new(AssetId::new(settings.default_asset_id.clone()));
        let state = Rc::new(RefCell::new(DashboardState::new(
            services.preferences,
            selection,
            u64::from(settings.search_debounce_ms),
        )));

        get_logger().info(
            LogComponent::Application("DashboardCoordinator"),
            "Creating dashboard coordinator",
        );

        Self {
            inner: Rc::new(Inner {
                refresh: RefreshSnapshotUseCase::new(state.clone(), services.market),
                series: LoadPriceSeriesUseCase::new(
                    state.clone(),
                    services.chart,
                    settings.chart_window_days,
                ),
                state,
                scheduler: RefCell::new(RefreshScheduler::new(services.timers.clone())),
                search_timer: RefCell::new(None),
                timers: services.timers,
                clock: services.clock,
                spawner: services.spawner,
                events: RefCell::new(InMemoryEventDispatcher::new()),
                settings,
                mounted: Cell::new(false),
            }),
        }
    }

    fn downgrade(&self) -> Weak<Inner> {
        Rc::downgrade(&self.inner)
    }

    fn upgrade(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    pub fn subscribe<F>(&self, handler: F)
    where
        F: Fn(&DashboardEvent) + 'static,
    {
        self.inner.events.borrow_mut().subscribe(handler);
    }

    fn publish(&self, event: DashboardEvent) {
        log_debug!(
            LogComponent::Application("DashboardCoordinator"),
            "Event {}",
            event.event_type()
        );
        self.inner.events.borrow().publish(event);
    }

    // --- lifecycle ---

    /// Starts auto-refresh (immediate fetch included) and loads the chart.
    pub fn mount(&self) {
        if self.inner.mounted.replace(true) {
            return;
        }

        // the immediate tick runs subscribers, so the scheduler must not stay borrowed
        let idle = RefreshScheduler::new(self.inner.timers.clone());
        let mut scheduler = self.inner.scheduler.replace(idle);
        let weak = self.downgrade();
        scheduler.start(self.inner.settings.refresh_interval_ms, move || {
            if let Some(this) = Self::upgrade(&weak) {
                this.spawn_refresh();
            }
        });
        *self.inner.scheduler.borrow_mut() = scheduler;
        self.spawn_series_load();
    }

    /// Cancels timers and discards every in-flight result.
    pub fn unmount(&self) {
        if !self.inner.mounted.replace(false) {
            return;
        }
        let mut scheduler = self.inner.scheduler.borrow_mut();
        if let Some(interval_ms) = scheduler.interval_ms() {
            get_logger().info(
                LogComponent::Application("DashboardCoordinator"),
                &format!("Stopping {interval_ms} ms auto-refresh"),
            );
        }
        scheduler.stop();
        drop(scheduler);
        self.inner.search_timer.borrow_mut().take();
        self.inner.state.borrow_mut().dispose();
        get_logger().info(
            LogComponent::Application("DashboardCoordinator"),
            "Dashboard unmounted",
        );
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.get()
    }

    pub fn is_auto_refreshing(&self) -> bool {
        self.inner.scheduler.borrow().is_active()
    }

    // --- fetches ---

    // tickets are issued here, synchronously, so a teardown before the
    // spawned future first runs still stales it
    fn spawn_refresh(&self) {
        let refresh = self.inner.refresh.clone();
        let ticket = refresh.begin();
        let weak = self.downgrade();
        self.publish(DashboardEvent::SnapshotRequested);
        (self.inner.spawner)(Box::pin(async move {
            let event = refresh.execute(ticket).await;
            if let (Some(event), Some(this)) = (event, Self::upgrade(&weak)) {
                this.publish(event);
            }
        }));
    }

    fn spawn_series_load(&self) {
        let series = self.inner.series.clone();
        let (ticket, asset_id) = series.begin();
        let weak = self.downgrade();
        self.publish(DashboardEvent::SeriesRequested {
            asset_id: asset_id.clone(),
        });
        (self.inner.spawner)(Box::pin(async move {
            let event = series.execute(ticket, asset_id).await;
            if let (Some(event), Some(this)) = (event, Self::upgrade(&weak)) {
                this.publish(event);
            }
        }));
    }

    // --- intents ---

    /// Manual refresh. Shares the snapshot guard with the periodic timer and
    /// does not touch the schedule.
    pub fn request_refresh(&self) {
        self.spawn_refresh();
    }

    pub fn set_search_text(&self, text: impl Into<String>) {
        let now = self.inner.clock.current_timestamp();
        let deadline = self.inner.state.borrow_mut().set_search_text(text, now);
        self.schedule_search_settle(deadline.saturating_sub(now));
    }

    fn schedule_search_settle(&self, delay_ms: u64) {
        let weak = self.downgrade();
        let delay = u32::try_from(delay_ms).unwrap_or(u32::MAX);
        let handle = self.inner.timers.once(
            delay,
            Box::new(move || {
                if let Some(this) = Self::upgrade(&weak) {
                    this.on_search_timer();
                }
            }),
        );
        // replacing the handle cancels the previous timeout
        *self.inner.search_timer.borrow_mut() = Some(handle);
    }

    fn on_search_timer(&self) {
        let now = self.inner.clock.current_timestamp();
        let settled = self.inner.state.borrow_mut().settle_search(now);
        match settled {
            Some(event) => {
                self.inner.search_timer.borrow_mut().take();
                self.publish(event);
            }
            None => {
                // timer fired a little early; wait out the remainder
                let deadline = self.inner.state.borrow().search_deadline();
                if let Some(deadline) = deadline {
                    self.schedule_search_settle(deadline.saturating_sub(now).max(1));
                }
            }
        }
    }

    pub fn select(&self, asset_id: AssetId) {
        let changed = self.inner.state.borrow_mut().select(asset_id);
        if let Some(event) = changed {
            self.publish(event);
            self.spawn_series_load();
        }
    }

    /// Re-fetches the chart for the current selection.
    pub fn reload_chart(&self) {
        self.spawn_series_load();
    }

    pub fn toggle_favorite(&self, asset_id: AssetId) {
        let event = self.inner.state.borrow_mut().toggle_favorite(asset_id);
        self.publish(event);
    }

    pub fn set_sort_key(&self, sort_key: SortKey) {
        let event = self.inner.state.borrow_mut().set_sort_key(sort_key);
        self.publish(event);
    }

    pub fn set_favorites_only(&self, enabled: bool) {
        let event = self.inner.state.borrow_mut().set_favorites_only(enabled);
        self.publish(event);
    }

    pub fn set_page(&self, page: usize) {
        let event = self.inner.state.borrow_mut().set_page(page);
        self.publish(event);
    }

    pub fn next_page(&self) {
        let event = self.inner.state.borrow_mut().next_page();
        self.publish(event);
    }

    pub fn previous_page(&self) {
        let event = self.inner.state.borrow_mut().previous_page();
        self.publish(event);
    }

    // --- outputs ---

    pub fn page(&self) -> Page {
        self.inner.state.borrow_mut().page()
    }

    pub fn table_status(&self) -> LoadStatus {
        self.inner.state.borrow().table_status().clone()
    }

    pub fn chart(&self) -> ChartState {
        self.inner.state.borrow().chart().clone()
    }

    pub fn controls(&self) -> ViewControls {
        self.inner.state.borrow().controls().clone()
    }

    pub fn selected(&self) -> AssetId {
        self.inner.state.borrow().selected().clone()
    }

    pub fn is_selected(&self, asset_id: &AssetId) -> bool {
        self.inner.state.borrow().is_selected(asset_id)
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.inner.settings
    }
}
