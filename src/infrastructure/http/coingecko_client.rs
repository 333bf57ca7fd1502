use super::dto::{parse_market_chart, parse_markets};
use super::{build_url, encode_path_segment, get_text};
use crate::config::DASHBOARD;
use crate::domain::errors::AppResult;
use crate::domain::logging::{LogComponent, LogLevel, get_logger};
use crate::domain::market_data::{AssetId, ChartDataSource, MarketDataSource, PricePoint, Snapshot};
use async_trait::async_trait;

/// REST client for the CoinGecko v3 API
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    base_url: String,
}

impl Default for CoinGeckoClient {
    fn default() -> Self {
        Self::new(DASHBOARD.api.base_url)
    }
}

impl CoinGeckoClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn markets_url(&self) -> String {
        build_url(
            &self.base_url,
            "coins/markets",
            &[
                ("vs_currency", DASHBOARD.api.vs_currency.to_string()),
                ("order", DASHBOARD.api.order.to_string()),
                ("per_page", DASHBOARD.api.per_page.to_string()),
                ("page", DASHBOARD.api.page.to_string()),
            ],
        )
    }

    pub fn market_chart_url(&self, asset_id: &AssetId, window_days: u32) -> String {
        build_url(
            &self.base_url,
            &format!("coins/{}/market_chart", encode_path_segment(asset_id.value())),
            &[
                ("vs_currency", DASHBOARD.api.vs_currency.to_string()),
                ("days", window_days.to_string()),
            ],
        )
    }
}

#[async_trait(?Send)]
impl MarketDataSource for CoinGeckoClient {
    async fn fetch_snapshot(&self) -> AppResult<Snapshot> {
        let body = get_text(&self.markets_url()).await?;
        let snapshot = parse_markets(&body)?;
        get_logger().info(
            LogComponent::Infrastructure("CoinGecko"),
            &format!("Fetched {} market records", snapshot.len()),
        );
        Ok(snapshot)
    }
}

#[async_trait(?Send)]
impl ChartDataSource for CoinGeckoClient {
    async fn fetch_series(&self, asset_id: &AssetId, window_days: u32) -> AppResult<Vec<PricePoint>> {
        let body = get_text(&self.market_chart_url(asset_id, window_days)).await?;
        let points = parse_market_chart(&body)?;
        get_logger().log_with_metadata(
            LogLevel::Info,
            LogComponent::Infrastructure("CoinGecko"),
            &format!("Fetched {} chart points", points.len()),
            asset_id.value(),
        );
        Ok(points)
    }
}
