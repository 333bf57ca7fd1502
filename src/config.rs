//! Dashboard configuration: compile-time defaults plus runtime overrides.

use crate::domain::errors::AppResult;
use serde::Deserialize;

/// Upstream market API (CoinGecko)
pub struct ApiConfig {
    pub base_url: &'static str,
    pub vs_currency: &'static str,
    pub order: &'static str,
    pub per_page: u32,
    pub page: u32,
    /// Trailing window for the price chart
    pub chart_window_days: u32,
}

pub struct TableConfig {
    pub page_size: usize,
    pub refresh_interval_ms: u32,
    pub search_debounce_ms: u32,
}

pub struct PreferencesConfig {
    /// localStorage entry holding the favorite id list
    pub favorites_key: &'static str,
}

pub struct SelectionConfig {
    pub default_asset_id: &'static str,
}

pub struct DashboardConfig {
    pub api: ApiConfig,
    pub table: TableConfig,
    pub preferences: PreferencesConfig,
    pub selection: SelectionConfig,
}

pub const DASHBOARD: DashboardConfig = DashboardConfig {
    api: ApiConfig {
        base_url: "https://api.coingecko.com/api/v3",
        vs_currency: "usd",
        order: "market_cap_desc",
        per_page: 100,
        page: 1,
        chart_window_days: 7,
    },
    table: TableConfig {
        page_size: 10,
        refresh_interval_ms: 60_000,
        search_debounce_ms: 500,
    },
    preferences: PreferencesConfig {
        favorites_key: "favorites",
    },
    selection: SelectionConfig {
        default_asset_id: "bitcoin",
    },
};

/// Values the host page may override (JSON in `#dashboard-settings`).
/// Missing fields fall back to [`DASHBOARD`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub api_base_url: String,
    pub refresh_interval_ms: u32,
    pub search_debounce_ms: u32,
    pub chart_window_days: u32,
    pub default_asset_id: String,
    pub favorites_key: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            api_base_url: DASHBOARD.api.base_url.to_string(),
            refresh_interval_ms: DASHBOARD.table.refresh_interval_ms,
            search_debounce_ms: DASHBOARD.table.search_debounce_ms,
            chart_window_days: DASHBOARD.api.chart_window_days,
            default_asset_id: DASHBOARD.selection.default_asset_id.to_string(),
            favorites_key: DASHBOARD.preferences.favorites_key.to_string(),
        }
    }
}

impl DashboardSettings {
    pub fn from_json(raw: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
