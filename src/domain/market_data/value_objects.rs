use derive_more::{Constructor, Display, From, Into};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

/// Value Object - upstream asset identifier ("bitcoin", "ethereum").
/// Join key for favorites and selection.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Value Object - USD price
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, From, Into, Constructor, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Rounded to two fractional digits (cents).
    pub fn to_cents_precision(self) -> Self {
        Self((self.0 * 100.0).round() / 100.0)
    }
}

/// Value Object - market capitalization in USD
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, From, Into, Constructor, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketCap(f64);

impl MarketCap {
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Value Object - 24h traded volume in USD
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, From, Into, Constructor, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Volume(f64);

impl Volume {
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Value Object - signed 24h percentage change
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Into, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PercentChange(f64);

impl PercentChange {
    pub fn new(value: f64) -> Self {
        // fold -0.0 into 0.0 so equal changes compare equal under total ordering
        Self(value + 0.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_gain(&self) -> bool {
        self.0 >= 0.0
    }
}

/// Value Object - milliseconds since the unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, From, Into, Constructor, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn from_millis(value: u64) -> Self {
        Self(value)
    }
}

/// Column the table is ordered by. Always descending.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, StrumDisplay, EnumIter, EnumString, AsRefStr,
    Serialize, Deserialize,
)]
pub enum SortKey {
    #[default]
    #[strum(serialize = "market_cap")]
    #[serde(rename = "market_cap")]
    MarketCap,

    #[strum(serialize = "price")]
    #[serde(rename = "price")]
    Price,

    #[strum(serialize = "change")]
    #[serde(rename = "change")]
    Change24h,
}

impl SortKey {
    pub fn label(&self) -> &'static str {
        match self {
            Self::MarketCap => "Sort by Market Cap",
            Self::Price => "Sort by Price",
            Self::Change24h => "Sort by 24h Change",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn price_rounds_to_cents() {
        assert_eq!(Price::new(64123.456_789).to_cents_precision().value(), 64123.46);
        assert_eq!(Price::new(0.004).to_cents_precision().value(), 0.0);
    }

    #[test]
    fn sort_key_round_trips_through_strings() {
        for key in SortKey::iter() {
            assert_eq!(SortKey::from_str(key.as_ref()).unwrap(), key);
        }
        assert_eq!(SortKey::default(), SortKey::MarketCap);
    }

    #[test]
    fn negative_zero_change_is_normalized() {
        assert_eq!(
            PercentChange::new(-0.0).value().total_cmp(&PercentChange::new(0.0).value()),
            std::cmp::Ordering::Equal
        );
    }
}
