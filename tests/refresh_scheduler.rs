mod common;

use common::{Harness, ScriptedChart, ScriptedMarket, points, ranked_snapshot, settings_with_refresh};
use crypto_dashboard_wasm::application::RefreshScheduler;
use crypto_dashboard_wasm::domain::events::DashboardEvent;
use crypto_dashboard_wasm::infrastructure::ManualTimerDriver;
use std::cell::RefCell;
use std::rc::Rc;

fn harness(refresh_ms: u32) -> Harness {
    Harness::new(
        ScriptedMarket::answering(Ok(ranked_snapshot(3))),
        ScriptedChart::answering(Ok(points(10.0))),
        settings_with_refresh(refresh_ms),
    )
}

#[test]
fn fetches_immediately_then_every_interval() {
    let mut h = harness(1_000);
    h.coordinator.mount();
    h.settle();
    assert_eq!(h.market.calls(), 1);
    assert!(h.coordinator.is_auto_refreshing());

    h.advance(1_000);
    assert_eq!(h.market.calls(), 2);
    h.advance(1_000);
    assert_eq!(h.market.calls(), 3);

    h.advance(500);
    h.coordinator.unmount();
    h.advance(10_000);
    assert_eq!(h.market.calls(), 3);
    assert!(!h.coordinator.is_auto_refreshing());
    assert_eq!(h.timers.active_timers(), 0);
}

#[test]
fn zero_interval_fetches_once() {
    let mut h = harness(0);
    h.coordinator.mount();
    h.advance(600_000);
    assert_eq!(h.market.calls(), 1);
    assert!(!h.coordinator.is_auto_refreshing());
}

#[test]
fn manual_refresh_keeps_the_schedule() {
    let mut h = harness(1_000);
    h.coordinator.mount();
    h.advance(400);
    h.coordinator.request_refresh();
    h.settle();
    assert_eq!(h.market.calls(), 2);

    h.advance(600);
    assert_eq!(h.market.calls(), 3);
    assert_eq!(
        h.count_events(|e| matches!(e, DashboardEvent::SnapshotLoaded { asset_count: 3 })),
        3
    );
}

#[test]
fn mounting_twice_keeps_one_timer() {
    let mut h = harness(1_000);
    h.coordinator.mount();
    h.coordinator.mount();
    h.settle();
    assert_eq!(h.market.calls(), 1);
    assert_eq!(h.timers.active_timers(), 1);
}

#[test]
fn restart_replaces_previous_timer() {
    let driver = ManualTimerDriver::default();
    let ticks = Rc::new(RefCell::new(Vec::new()));
    let mut scheduler = RefreshScheduler::new(Rc::new(driver.clone()));

    let sink = ticks.clone();
    let clock = driver.clock();
    scheduler.start(1_000, move || sink.borrow_mut().push(("first", clock.now())));
    driver.advance(1_500);

    let sink = ticks.clone();
    let clock = driver.clock();
    scheduler.start(1_000, move || sink.borrow_mut().push(("second", clock.now())));
    assert_eq!(driver.active_timers(), 1);
    assert_eq!(scheduler.interval_ms(), Some(1_000));

    driver.advance(1_000);
    assert_eq!(
        *ticks.borrow(),
        vec![("first", 0), ("first", 1_000), ("second", 1_500), ("second", 2_500)]
    );

    scheduler.stop();
    scheduler.stop();
    driver.advance(5_000);
    assert_eq!(ticks.borrow().len(), 4);
    assert_eq!(driver.active_timers(), 0);
}
