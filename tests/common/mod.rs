#![allow(dead_code)]

use async_trait::async_trait;
use crypto_dashboard_wasm::application::{DashboardCoordinator, DashboardServices};
use crypto_dashboard_wasm::config::DashboardSettings;
use crypto_dashboard_wasm::domain::errors::{AppError, AppResult};
use crypto_dashboard_wasm::domain::events::DashboardEvent;
use crypto_dashboard_wasm::domain::market_data::{
    Asset, AssetId, ChartDataSource, MarketDataSource, Price, PricePoint, Snapshot, Timestamp,
};
use crypto_dashboard_wasm::domain::preferences::FavoritesStore;
use crypto_dashboard_wasm::infrastructure::{InMemoryStorage, ManualTimerDriver};
use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

pub fn asset(id: &str, market_cap: f64) -> Asset {
    Asset::new(id, id.to_uppercase(), id.chars().take(3).collect::<String>())
        .with_market_cap(market_cap)
        .with_price(market_cap / 1000.0)
}

/// `count` assets named `coin-00`, `coin-01`, ... with descending market cap
pub fn ranked_snapshot(count: usize) -> Snapshot {
    (0..count)
        .map(|i| asset(&format!("coin-{i:02}"), (count - i) as f64 * 1_000.0))
        .collect::<Vec<_>>()
        .into()
}

pub fn points(base: f64) -> Vec<PricePoint> {
    (0..3)
        .map(|i| PricePoint::new(Timestamp::from_millis(i * 1000), Price::new(base + i as f64)))
        .collect()
}

type Reply<T> = oneshot::Sender<AppResult<T>>;

/// Snapshot source that either answers immediately or parks every call
/// until the test resolves it.
#[derive(Default)]
pub struct ScriptedMarket {
    immediate: RefCell<Option<AppResult<Snapshot>>>,
    parked: RefCell<Vec<Option<Reply<Snapshot>>>>,
    calls: Cell<usize>,
}

impl ScriptedMarket {
    pub fn answering(result: AppResult<Snapshot>) -> Self {
        let market = Self::default();
        market.answer_with(result);
        market
    }

    pub fn answer_with(&self, result: AppResult<Snapshot>) {
        *self.immediate.borrow_mut() = Some(result);
    }

    pub fn park(&self) {
        self.immediate.borrow_mut().take();
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn resolve(&self, call: usize, result: AppResult<Snapshot>) {
        let reply = self.parked.borrow_mut()[call].take().expect("call already resolved");
        let _ = reply.send(result);
    }
}

#[async_trait(?Send)]
impl MarketDataSource for ScriptedMarket {
    async fn fetch_snapshot(&self) -> AppResult<Snapshot> {
        self.calls.set(self.calls.get() + 1);
        if let Some(result) = self.immediate.borrow().clone() {
            return result;
        }
        let (tx, rx) = oneshot::channel();
        self.parked.borrow_mut().push(Some(tx));
        rx.await
            .unwrap_or_else(|_| Err(AppError::NetworkError("request dropped".to_string())))
    }
}

/// Chart source that records every requested id and parks the call unless
/// an immediate answer is configured.
#[derive(Default)]
pub struct ScriptedChart {
    immediate: RefCell<Option<AppResult<Vec<PricePoint>>>>,
    parked: RefCell<Vec<(AssetId, Option<Reply<Vec<PricePoint>>>)>>,
    requested: RefCell<Vec<AssetId>>,
}

impl ScriptedChart {
    pub fn answering(result: AppResult<Vec<PricePoint>>) -> Self {
        let chart = Self::default();
        *chart.immediate.borrow_mut() = Some(result);
        chart
    }

    pub fn requested(&self) -> Vec<AssetId> {
        self.requested.borrow().clone()
    }

    /// Resolves the parked request for the `call`-th fetch.
    pub fn resolve(&self, call: usize, result: AppResult<Vec<PricePoint>>) {
        let reply = self.parked.borrow_mut()[call].1.take().expect("call already resolved");
        let _ = reply.send(result);
    }
}

#[async_trait(?Send)]
impl ChartDataSource for ScriptedChart {
    async fn fetch_series(&self, asset_id: &AssetId, _window_days: u32) -> AppResult<Vec<PricePoint>> {
        self.requested.borrow_mut().push(asset_id.clone());
        if let Some(result) = self.immediate.borrow().clone() {
            return result;
        }
        let (tx, rx) = oneshot::channel();
        self.parked.borrow_mut().push((asset_id.clone(), Some(tx)));
        rx.await
            .unwrap_or_else(|_| Err(AppError::NetworkError("request dropped".to_string())))
    }
}

/// Coordinator wired to scripted sources, virtual timers and a local executor
pub struct Harness {
    pub pool: LocalPool,
    pub timers: ManualTimerDriver,
    pub market: Rc<ScriptedMarket>,
    pub chart: Rc<ScriptedChart>,
    pub storage: InMemoryStorage,
    pub coordinator: DashboardCoordinator,
    pub events: Rc<RefCell<Vec<DashboardEvent>>>,
}

impl Harness {
    pub fn new(market: ScriptedMarket, chart: ScriptedChart, settings: DashboardSettings) -> Self {
        Self::with_storage(market, chart, settings, InMemoryStorage::new())
    }

    pub fn with_storage(
        market: ScriptedMarket,
        chart: ScriptedChart,
        settings: DashboardSettings,
        storage: InMemoryStorage,
    ) -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        let timers = ManualTimerDriver::default();
        let market = Rc::new(market);
        let chart = Rc::new(chart);

        let services = DashboardServices {
            market: market.clone(),
            chart: chart.clone(),
            preferences: Box::new(FavoritesStore::open(
                storage.clone(),
                settings.favorites_key.clone(),
            )),
            timers: Rc::new(timers.clone()),
            clock: Arc::new(timers.clock()),
            spawner: Rc::new(move |future: LocalBoxFuture<'static, ()>| {
                spawner.spawn_local(future).expect("executor alive");
            }),
        };
        let coordinator = DashboardCoordinator::new(services, settings);

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        coordinator.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        Self {
            pool,
            timers,
            market,
            chart,
            storage,
            coordinator,
            events,
        }
    }

    /// Runs spawned fetches until they all wait on something.
    pub fn settle(&mut self) {
        self.pool.run_until_stalled();
    }

    pub fn advance(&mut self, ms: u64) {
        self.timers.advance(ms);
        self.settle();
    }

    pub fn count_events(&self, matches: impl Fn(&DashboardEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| matches(e)).count()
    }
}

pub fn settings_with_refresh(refresh_interval_ms: u32) -> DashboardSettings {
    DashboardSettings {
        refresh_interval_ms,
        ..DashboardSettings::default()
    }
}
