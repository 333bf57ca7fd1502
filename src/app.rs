use leptos::*;
use std::str::FromStr;
use strum::IntoEnumIterator;

use crate::application::{DashboardCoordinator, LoadStatus};
use crate::domain::dashboard::AssetRow;
use crate::domain::events::DomainEvent;
use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::market_data::{PriceSeries, SortKey};
use crate::formatting::{
    format_change, format_last_updated, format_time_label, format_usd, trend_arrow,
};
use crate::global_state::{bump_revision, globals};

const CHART_WIDTH: f64 = 640.0;
const CHART_HEIGHT: f64 = 240.0;

/// Maps a series onto an SVG viewport. Oldest point on the left, highest
/// price at the top. A flat series is drawn through the vertical middle.
pub fn chart_points(series: &PriceSeries, width: f64, height: f64) -> Vec<(f64, f64)> {
    let Some((low, high)) = series.price_range() else {
        return Vec::new();
    };
    let span = high.value() - low.value();
    let last = series.len().saturating_sub(1).max(1) as f64;

    series
        .points()
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let x = i as f64 / last * width;
            let y = if span > 0.0 {
                height - (point.price.value() - low.value()) / span * height
            } else {
                height / 2.0
            };
            (x, y)
        })
        .collect()
}

/// Message shown instead of table rows. An error wins over any rows still
/// held from an earlier snapshot.
pub fn table_notice(status: &LoadStatus, has_rows: bool) -> Option<String> {
    if let Some(error) = &status.error {
        return Some(format!("Failed to load market data: {error}"));
    }
    match (has_rows, status.loading) {
        (true, _) => None,
        (false, true) => Some("Loading...".to_string()),
        (false, false) => Some("No data found.".to_string()),
    }
}

fn polyline(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{x:.1},{y:.1}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Root component. Mounts the coordinator and tears it down on cleanup.
#[component]
pub fn Dashboard(coordinator: DashboardCoordinator) -> impl IntoView {
    coordinator.subscribe(|event| bump_revision(event.event_type()));
    coordinator.mount();

    on_cleanup({
        let coordinator = coordinator.clone();
        move || coordinator.unmount()
    });

    get_logger().info(LogComponent::Presentation("Dashboard"), "Dashboard mounted");

    view! {
        <style>
            {r#"
            .dashboard { font-family: -apple-system, BlinkMacSystemFont, sans-serif; padding: 20px; color: #1f2933; }
            .controls { display: flex; gap: 12px; align-items: center; margin-bottom: 12px; }
            .panels { display: grid; grid-template-columns: 3fr 2fr; gap: 20px; }
            table { width: 100%; border-collapse: collapse; font-size: 14px; }
            th, td { padding: 6px 8px; border-bottom: 1px solid #e4e7eb; text-align: left; }
            tr.selected { background: #e8f0fe; }
            tbody tr { cursor: pointer; }
            .gain { color: #16a34a; font-weight: 600; }
            .loss { color: #dc2626; font-weight: 600; }
            .error { color: #dc2626; margin: 8px 0; }
            .muted { color: #7b8794; font-size: 12px; }
            .star { border: none; background: none; cursor: pointer; font-size: 16px; }
            .pager { display: flex; gap: 8px; align-items: center; margin-top: 8px; }
            "#}
        </style>
        <div class="dashboard">
            <h1>"Crypto Market Dashboard"</h1>
            <Controls coordinator=coordinator.clone() />
            <div class="panels">
                <AssetTable coordinator=coordinator.clone() />
                <PriceChart coordinator=coordinator />
            </div>
            <div class="muted">{move || globals().last_event.get()}</div>
        </div>
    }
}

#[component]
fn Controls(coordinator: DashboardCoordinator) -> impl IntoView {
    let revision = globals().revision;

    let search_value = {
        let c = coordinator.clone();
        move || {
            revision.get();
            c.controls().search_text
        }
    };
    let favorites_only = {
        let c = coordinator.clone();
        move || {
            revision.get();
            c.controls().favorites_only
        }
    };
    let current_sort = {
        let c = coordinator.clone();
        move || {
            revision.get();
            c.controls().sort_key
        }
    };

    let on_search = {
        let c = coordinator.clone();
        move |ev: ev::Event| c.set_search_text(event_target_value(&ev))
    };
    let on_sort = {
        let c = coordinator.clone();
        move |ev: ev::Event| match SortKey::from_str(&event_target_value(&ev)) {
            Ok(key) => c.set_sort_key(key),
            Err(e) => get_logger().warn(
                LogComponent::Presentation("Controls"),
                &format!("Unknown sort key: {e}"),
            ),
        }
    };
    let on_favorites_only = {
        let c = coordinator.clone();
        move |ev: ev::Event| c.set_favorites_only(event_target_checked(&ev))
    };
    let on_refresh = move |_| coordinator.request_refresh();

    view! {
        <div class="controls">
            <input
                type="search"
                placeholder="Search by name or symbol"
                prop:value=search_value
                on:input=on_search
            />
            <select on:change=on_sort>
                {SortKey::iter()
                    .map(|key| {
                        let current_sort = current_sort.clone();
                        view! {
                            <option value=key.to_string() selected=move || current_sort() == key>
                                {key.label()}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
            <label>
                <input type="checkbox" prop:checked=favorites_only on:change=on_favorites_only />
                " Favorites only"
            </label>
            <button on:click=on_refresh>"Refresh"</button>
        </div>
    }
}

#[component]
fn AssetTable(coordinator: DashboardCoordinator) -> impl IntoView {
    let revision = globals().revision;

    let status = {
        let c = coordinator.clone();
        move || {
            revision.get();
            c.table_status()
        }
    };
    let page = {
        let c = coordinator.clone();
        create_memo(move |_| {
            revision.get();
            c.page()
        })
    };

    let row_view = {
        let coordinator = coordinator.clone();
        move |row: AssetRow| {
            let c = coordinator.clone();
            let select_id = row.asset.id.clone();
            let favorite_id = row.asset.id.clone();
            let selected = {
                let c = c.clone();
                let id = row.asset.id.clone();
                move || {
                    revision.get();
                    c.is_selected(&id)
                }
            };
            let on_select = {
                let c = c.clone();
                move |_| c.select(select_id.clone())
            };
            let on_star = move |ev: ev::MouseEvent| {
                ev.stop_propagation();
                c.toggle_favorite(favorite_id.clone());
            };
            let change = row.asset.price_change_percentage_24h;
            let change_class = if change.is_gain() { "gain" } else { "loss" };

            view! {
                <tr class:selected=selected on:click=on_select>
                    <td>
                        <button class="star" on:click=on_star>
                            {if row.is_favorite { "★" } else { "☆" }}
                        </button>
                    </td>
                    <td>
                        <img src=row.asset.image.clone() width="20" height="20" alt="" />
                        " " {row.asset.name.clone()} " "
                        <span class="muted">{row.asset.symbol.to_uppercase()}</span>
                    </td>
                    <td>{format_usd(row.asset.current_price.value())}</td>
                    <td class=change_class>{trend_arrow(change)} " " {format_change(change)}</td>
                    <td>{format_usd(row.asset.market_cap.value())}</td>
                    <td>{format_usd(row.asset.total_volume.value())}</td>
                    <td class="muted">{format_last_updated(&row.asset.last_updated)}</td>
                </tr>
            }
        }
    };

    let pager = move || {
        let previous = coordinator.clone();
        let next = coordinator.clone();
        view! {
            <div class="pager">
                <button
                    disabled=move || !page.with(|p| p.has_previous())
                    on:click=move |_| previous.previous_page()
                >
                    "Prev"
                </button>
                <span>
                    {move || page.with(|p| format!("Page {} of {}", p.current_page, p.total_pages))}
                </span>
                <button
                    disabled=move || !page.with(|p| p.has_next())
                    on:click=move |_| next.next_page()
                >
                    "Next"
                </button>
            </div>
        }
    };

    let body = {
        let status = status.clone();
        move || {
            let current = page.get();
            match table_notice(&status(), !current.is_empty()) {
                Some(message) => view! { <tr><td colspan="7">{message}</td></tr> }.into_view(),
                None => current.rows.into_iter().map(row_view.clone()).collect_view(),
            }
        }
    };

    let error = create_memo(move |_| status().error);

    // an error replaces the table and pager until the next successful refresh
    move || {
        let failed = LoadStatus {
            loading: false,
            error: error.get(),
        };
        if failed.error.is_some() {
            let message = table_notice(&failed, false).unwrap_or_default();
            return view! { <div class="error">{message}</div> }.into_view();
        }
        view! {
            <div>
                <table>
                    <thead>
                        <tr>
                            <th></th>
                            <th>"Name"</th>
                            <th>"Price"</th>
                            <th>"24h"</th>
                            <th>"Market Cap"</th>
                            <th>"Volume"</th>
                            <th>"Last Updated"</th>
                        </tr>
                    </thead>
                    <tbody>{body.clone()}</tbody>
                </table>
                {pager()}
            </div>
        }
        .into_view()
    }
}

#[component]
fn PriceChart(coordinator: DashboardCoordinator) -> impl IntoView {
    let revision = globals().revision;
    let retry = coordinator.clone();
    let chart = create_memo(move |_| {
        revision.get();
        coordinator.chart()
    });

    view! {
        <div>
            <h2>{move || chart.with(|c| format!("{} (7 days)", c.asset_id))}</h2>
            {move || {
                chart.with(|c| {
                    if c.status.loading {
                        return view! { <div class="muted">"Loading chart..."</div> }.into_view();
                    }
                    if let Some(error) = &c.status.error {
                        let retry = retry.clone();
                        return view! {
                            <div class="error">
                                {format!("Failed to load chart: {error}")} " "
                                <button on:click=move |_| retry.reload_chart()>"Retry"</button>
                            </div>
                        }
                        .into_view();
                    }
                    let Some((low, high)) = c.series.price_range() else {
                        return view! { <div class="muted">"No data found."</div> }.into_view();
                    };

                    let points = polyline(&chart_points(&c.series, CHART_WIDTH, CHART_HEIGHT));
                    let first = c.series.points().first().map(|p| format_time_label(p.timestamp.value())).unwrap_or_default();
                    let last = c.series.latest().map(|p| format_time_label(p.timestamp.value())).unwrap_or_default();

                    view! {
                        <svg viewBox=format!("0 0 {CHART_WIDTH} {CHART_HEIGHT}") width="100%" height="240">
                            <polyline points=points fill="none" stroke="#2563eb" stroke-width="2" />
                        </svg>
                        <div class="muted">
                            {format!("{first} to {last}, low {}, high {}", format_usd(low.value()), format_usd(high.value()))}
                        </div>
                    }
                    .into_view()
                })
            }}
        </div>
    }
}
