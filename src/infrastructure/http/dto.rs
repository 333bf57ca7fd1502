use crate::domain::errors::{AppError, AppResult};
use crate::domain::market_data::{Asset, AssetId, Price, PricePoint, Snapshot, Timestamp};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One row of `/coins/markets`. Numeric fields may be `null` upstream.
#[derive(Debug, Deserialize)]
pub struct MarketRecordDto {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

impl MarketRecordDto {
    /// Missing numbers become 0 so the row still sorts and renders.
    pub fn to_domain_asset(&self) -> Asset {
        let last_updated = self
            .last_updated
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_default();

        Asset::new(AssetId::new(self.id.clone()), self.name.clone(), self.symbol.clone())
            .with_image(self.image.clone().unwrap_or_default())
            .with_price(self.current_price.unwrap_or(0.0))
            .with_market_cap(self.market_cap.unwrap_or(0.0))
            .with_volume(self.total_volume.unwrap_or(0.0))
            .with_change(self.price_change_percentage_24h.unwrap_or(0.0))
            .with_last_updated(last_updated)
    }
}

/// `/coins/{id}/market_chart` body: `{"prices": [[ms, price], ...]}`
#[derive(Debug, Deserialize)]
pub struct MarketChartDto {
    pub prices: Vec<(f64, f64)>,
}

impl MarketChartDto {
    /// Prices rounded to cents, ordered by time.
    pub fn to_domain_points(&self) -> Vec<PricePoint> {
        let mut points: Vec<PricePoint> = self
            .prices
            .iter()
            .map(|&(ms, price)| {
                PricePoint::new(
                    Timestamp::from_millis(ms.max(0.0) as u64),
                    Price::new(price).to_cents_precision(),
                )
            })
            .collect();
        points.sort_by_key(|p| p.timestamp);
        points
    }
}

pub fn parse_markets(body: &str) -> AppResult<Snapshot> {
    let records: Vec<MarketRecordDto> = serde_json::from_str(body)
        .map_err(|e| AppError::DecodeError(format!("markets payload: {e}")))?;
    Ok(records.iter().map(MarketRecordDto::to_domain_asset).collect::<Vec<_>>().into())
}

pub fn parse_market_chart(body: &str) -> AppResult<Vec<PricePoint>> {
    let chart: MarketChartDto = serde_json::from_str(body)
        .map_err(|e| AppError::DecodeError(format!("market_chart payload: {e}")))?;
    Ok(chart.to_domain_points())
}
