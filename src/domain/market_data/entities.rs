pub use super::value_objects::{AssetId, MarketCap, PercentChange, Price, Timestamp, Volume};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Domain entity - one row of a market snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    pub symbol: String,
    pub image: String,
    pub current_price: Price,
    pub market_cap: MarketCap,
    pub total_volume: Volume,
    pub price_change_percentage_24h: PercentChange,
    pub last_updated: DateTime<Utc>,
}

impl Asset {
    /// Asset with zeroed metrics; chain the `with_*` setters to fill it in.
    pub fn new(id: impl Into<AssetId>, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            image: String::new(),
            current_price: Price::default(),
            market_cap: MarketCap::default(),
            total_volume: Volume::default(),
            price_change_percentage_24h: PercentChange::default(),
            last_updated: DateTime::<Utc>::default(),
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.current_price = Price::new(price);
        self
    }

    pub fn with_market_cap(mut self, market_cap: f64) -> Self {
        self.market_cap = MarketCap::new(market_cap);
        self
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.total_volume = Volume::new(volume);
        self
    }

    pub fn with_change(mut self, change: f64) -> Self {
        self.price_change_percentage_24h = PercentChange::new(change);
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_last_updated(mut self, last_updated: DateTime<Utc>) -> Self {
        self.last_updated = last_updated;
        self
    }

    /// `needle` must already be lowercase. Empty needle matches everything.
    pub fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.symbol.to_lowercase().contains(needle)
    }
}

/// Immutable result of one snapshot fetch. Replaced wholesale on refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    assets: Arc<Vec<Asset>>,
}

impl Snapshot {
    pub fn new(assets: Vec<Asset>) -> Self {
        Self { assets: Arc::new(assets) }
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn get(&self, id: &AssetId) -> Option<&Asset> {
        self.assets.iter().find(|asset| &asset.id == id)
    }
}

impl From<Vec<Asset>> for Snapshot {
    fn from(assets: Vec<Asset>) -> Self {
        Self::new(assets)
    }
}

/// Domain entity - one chart sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: Timestamp,
    pub price: Price,
}

impl PricePoint {
    pub fn new(timestamp: Timestamp, price: Price) -> Self {
        Self { timestamp, price }
    }
}

/// Time-ordered price series for a single asset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Sorts by timestamp ascending; points sharing a timestamp keep their order.
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.timestamp);
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// (min, max) price across the series
    pub fn price_range(&self) -> Option<(Price, Price)> {
        let first = self.points.first()?.price;
        Some(self.points.iter().fold((first, first), |(lo, hi), p| {
            (
                if p.price.value() < lo.value() { p.price } else { lo },
                if p.price.value() > hi.value() { p.price } else { hi },
            )
        }))
    }
}

impl From<Vec<PricePoint>> for PriceSeries {
    fn from(points: Vec<PricePoint>) -> Self {
        Self::new(points)
    }
}
