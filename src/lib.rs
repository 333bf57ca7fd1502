use std::rc::Rc;
use std::sync::Arc;

use futures::future::LocalBoxFuture;
use leptos::*;
use wasm_bindgen::prelude::*;

use crate::app::Dashboard;
use crate::application::{DashboardCoordinator, DashboardServices};
use crate::config::DashboardSettings;
use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::preferences::FavoritesStore;
use crate::infrastructure::{
    BrowserTimeProvider, CoinGeckoClient, ConsoleLogger, GlooTimerDriver, LocalStorageBackend,
};

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod formatting;
pub mod global_state;
pub mod infrastructure;

/// Element whose text content may hold a JSON [`DashboardSettings`] override
pub const SETTINGS_ELEMENT_ID: &str = "dashboard-settings";

/// Wires the coordinator to the browser: CoinGecko over fetch, favorites in
/// localStorage, gloo timers and `spawn_local`.
pub fn browser_services(settings: &DashboardSettings) -> DashboardServices {
    let client = Rc::new(CoinGeckoClient::new(settings.api_base_url.clone()));
    DashboardServices {
        market: client.clone(),
        chart: client,
        preferences: Box::new(FavoritesStore::open(
            LocalStorageBackend::new(),
            settings.favorites_key.clone(),
        )),
        timers: Rc::new(GlooTimerDriver),
        clock: Arc::new(BrowserTimeProvider::new()),
        spawner: Rc::new(|future: LocalBoxFuture<'static, ()>| {
            wasm_bindgen_futures::spawn_local(future)
        }),
    }
}

fn read_settings() -> DashboardSettings {
    let raw = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(SETTINGS_ELEMENT_ID))
        .and_then(|element| element.text_content());

    let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
        return DashboardSettings::default();
    };

    DashboardSettings::from_json(&raw).unwrap_or_else(|e| {
        get_logger().warn(
            LogComponent::Presentation("Initialize"),
            &format!("Ignoring invalid #{SETTINGS_ELEMENT_ID}: {e}"),
        );
        DashboardSettings::default()
    })
}

/// Installs logging, reads settings and mounts the dashboard
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    #[cfg(debug_assertions)]
    let console_logger = ConsoleLogger::new_development();
    #[cfg(not(debug_assertions))]
    let console_logger = ConsoleLogger::new_production();
    domain::logging::init_logger(Box::new(console_logger));
    domain::logging::init_time_provider(Box::new(BrowserTimeProvider::new()));

    let settings = read_settings();
    get_logger().info(
        LogComponent::Presentation("Initialize"),
        &format!(
            "Starting dashboard: refresh every {} ms, chart window {} days",
            settings.refresh_interval_ms, settings.chart_window_days
        ),
    );

    let coordinator = DashboardCoordinator::new(browser_services(&settings), settings);
    mount_to_body(move || view! { <Dashboard coordinator=coordinator /> });
}
