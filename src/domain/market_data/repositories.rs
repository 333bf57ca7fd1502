use crate::domain::errors::AppResult;
use crate::domain::market_data::{AssetId, PricePoint, Snapshot};
use async_trait::async_trait;

/// Source of market snapshots. No retry and no caching: every call
/// reflects the upstream at that moment.
#[async_trait(?Send)]
pub trait MarketDataSource {
    async fn fetch_snapshot(&self) -> AppResult<Snapshot>;
}

/// Source of per-asset price history. Implementations return points ordered
/// by timestamp ascending with prices rounded to cents.
#[async_trait(?Send)]
pub trait ChartDataSource {
    async fn fetch_series(&self, asset_id: &AssetId, window_days: u32) -> AppResult<Vec<PricePoint>>;
}
