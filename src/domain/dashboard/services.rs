use super::value_objects::{AssetRow, Page, ViewControls};
use crate::config::DASHBOARD;
use crate::domain::market_data::{Asset, Snapshot, SortKey};
use std::cmp::Ordering;

/// Number of pages needed for `count` rows; at least one.
pub fn page_count(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Clamps a requested 1-based page into `1..=total_pages`.
pub fn clamp_page(requested: usize, total_pages: usize) -> usize {
    requested.clamp(1, total_pages.max(1))
}

fn sort_value(asset: &Asset, key: SortKey) -> f64 {
    match key {
        SortKey::MarketCap => asset.market_cap.value(),
        SortKey::Price => asset.current_price.value(),
        SortKey::Change24h => asset.price_change_percentage_24h.value(),
    }
}

fn descending(a: &Asset, b: &Asset, key: SortKey) -> Ordering {
    sort_value(b, key).total_cmp(&sort_value(a, key))
}

/// Filter → sort → paginate using the configured page size.
pub fn derive(snapshot: &Snapshot, controls: &ViewControls) -> Page {
    derive_with_page_size(snapshot, controls, DASHBOARD.table.page_size)
}

pub fn derive_with_page_size(snapshot: &Snapshot, controls: &ViewControls, page_size: usize) -> Page {
    let page_size = page_size.max(1);
    let needle = controls.effective_search.to_lowercase();

    let mut visible: Vec<&Asset> = snapshot
        .assets()
        .iter()
        .filter(|asset| asset.matches_search(&needle))
        .filter(|asset| !controls.favorites_only || controls.favorites.contains(&asset.id))
        .collect();

    // sort_by is stable: ties keep snapshot order
    visible.sort_by(|a, b| descending(a, b, controls.sort_key));

    let filtered_count = visible.len();
    let total_pages = page_count(filtered_count, page_size);
    let current_page = clamp_page(controls.page, total_pages);

    let rows = visible
        .into_iter()
        .skip((current_page - 1) * page_size)
        .take(page_size)
        .map(|asset| AssetRow {
            is_favorite: controls.favorites.contains(&asset.id),
            asset: asset.clone(),
        })
        .collect();

    Page {
        rows,
        current_page,
        total_pages,
        filtered_count,
    }
}
