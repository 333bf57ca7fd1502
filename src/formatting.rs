//! Display helpers for prices, percentages and dates.

use crate::domain::market_data::PercentChange;
use chrono::{DateTime, Utc};

/// `1234567.891` -> `$1,234,567.89`
pub fn format_usd(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u128;
    let whole = group_thousands(cents / 100);
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${whole}.{:02}", cents % 100)
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Signed, two decimals: `+2.50%`, `-1.25%`, `0.00%`
pub fn format_change(change: PercentChange) -> String {
    let value = change.value();
    if value > 0.0 {
        format!("+{value:.2}%")
    } else {
        format!("{value:.2}%")
    }
}

pub fn trend_arrow(change: PercentChange) -> &'static str {
    if change.is_gain() { "▲" } else { "▼" }
}

pub fn format_last_updated(at: &DateTime<Utc>) -> String {
    at.format("%d.%m.%Y %H:%M:%S UTC").to_string()
}

/// Chart axis label (`DD.MM`, UTC)
pub fn format_time_label(timestamp_ms: u64) -> String {
    i64::try_from(timestamp_ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.format("%d.%m").to_string())
        .unwrap_or_default()
}
