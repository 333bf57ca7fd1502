//! HTTP plumbing shared by the market data clients.

pub mod coingecko_client;
pub mod dto;

pub use coingecko_client::CoinGeckoClient;

use crate::domain::errors::{AppError, AppResult};
use crate::domain::logging::LogComponent;
use crate::log_debug;
use gloo_net::http::Request;

/// Appends `params` as a query string. Values are expected to be URL-safe.
pub fn build_url(base: &str, path: &str, params: &[(&str, String)]) -> String {
    let mut url = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    for (i, (key, value)) in params.iter().enumerate() {
        url.push(if i == 0 { '?' } else { '&' });
        url.push_str(key);
        url.push('=');
        url.push_str(value);
    }
    url
}

/// Percent-encodes everything outside the RFC 3986 unreserved set, so an
/// arbitrary id stays a single path segment.
pub fn encode_path_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(char::from(byte));
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

/// GETs `url` and returns the body. Transport failures and non-2xx statuses
/// are network errors; an unreadable body is a decode error.
pub async fn get_text(url: &str) -> AppResult<String> {
    log_debug!(LogComponent::Infrastructure("Http"), "GET {url}");

    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| AppError::NetworkError(format!("Failed to send request: {e}")))?;

    if !response.ok() {
        return Err(AppError::NetworkError(format!(
            "HTTP error: {} - {}",
            response.status(),
            response.status_text()
        )));
    }

    response
        .text()
        .await
        .map_err(|e| AppError::DecodeError(format!("Failed to read body: {e}")))
}
