mod common;

use common::{Harness, ScriptedChart, ScriptedMarket, points, ranked_snapshot};
use crypto_dashboard_wasm::config::DashboardSettings;
use crypto_dashboard_wasm::domain::market_data::SortKey;

fn mounted(count: usize) -> Harness {
    let mut h = Harness::new(
        ScriptedMarket::answering(Ok(ranked_snapshot(count))),
        ScriptedChart::answering(Ok(points(1.0))),
        DashboardSettings::default(),
    );
    h.coordinator.mount();
    h.settle();
    h
}

#[test]
fn next_and_previous_stop_at_the_edges() {
    let h = mounted(25);

    h.coordinator.previous_page();
    assert_eq!(h.coordinator.page().current_page, 1);

    h.coordinator.next_page();
    h.coordinator.next_page();
    h.coordinator.next_page();
    let page = h.coordinator.page();
    assert_eq!(page.current_page, 3);
    assert_eq!(page.rows.len(), 5);

    h.coordinator.previous_page();
    assert_eq!(h.coordinator.page().current_page, 2);
}

#[test]
fn narrowing_the_search_pulls_the_page_back() {
    let mut h = mounted(25);
    h.coordinator.set_page(3);
    assert_eq!(h.coordinator.page().current_page, 3);

    h.coordinator.set_search_text("coin-0");
    h.advance(500);
    let page = h.coordinator.page();
    assert_eq!(page.filtered_count, 10);
    assert_eq!(page.current_page, 1);
    assert_eq!(h.coordinator.controls().page, 1);
}

#[test]
fn sort_change_keeps_the_page_when_it_still_exists() {
    let h = mounted(25);
    h.coordinator.set_page(2);
    h.coordinator.set_sort_key(SortKey::Price);

    let page = h.coordinator.page();
    assert_eq!(page.current_page, 2);
    assert_eq!(page.rows[0].asset.id.value(), "coin-10");
    assert_eq!(h.coordinator.controls().sort_key, SortKey::Price);
}

#[test]
fn next_page_from_an_oversized_page_lands_on_the_last() {
    let h = mounted(25);
    h.coordinator.set_page(usize::MAX);
    h.coordinator.next_page();

    assert_eq!(h.coordinator.controls().page, 3);
    assert_eq!(h.coordinator.page().current_page, 3);

    h.coordinator.set_page(usize::MAX);
    h.coordinator.previous_page();
    assert_eq!(h.coordinator.page().current_page, 3);
}
