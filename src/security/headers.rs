//! Header names and header manipulation.
//!
//! # Responsibilities
//! - Locate the inbound rotating token (`Authorization`, then `X-Aipex-Token`)
//! - Locate the carrier subscription key
//! - Strip hop-by-hop headers from relayed upstream responses
//!
//! # Design Decisions
//! - An empty header value counts as absent
//! - `Authorization` is compared verbatim: no `Bearer ` stripping
//! - Framing headers are rebuilt by the server, never copied

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};

pub const SUBSCRIPTION_KEY: &str = "ocp-apim-subscription-key";
/// Display form used in error messages.
pub const SUBSCRIPTION_KEY_DISPLAY: &str = "Ocp-Apim-Subscription-Key";
pub const AIPEX_TOKEN: &str = "x-aipex-token";
pub const UPSTREAM_USER_AGENT: &str = "Aipex-Middleman/1.0";

const HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// The presented rotating token, if any.
pub fn presented_token(headers: &HeaderMap) -> Option<String> {
    non_empty(headers.get(header::AUTHORIZATION))
        .or_else(|| non_empty(headers.get(AIPEX_TOKEN)))
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}

/// The carrier subscription key, if present and non-empty.
pub fn subscription_key(headers: &HeaderMap) -> Option<&HeaderValue> {
    non_empty(headers.get(SUBSCRIPTION_KEY))
}

/// Remove hop-by-hop headers, including any named by `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in named.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
    headers.remove("keep-alive");
}

fn non_empty(value: Option<&HeaderValue>) -> Option<&HeaderValue> {
    value.filter(|v| !v.is_empty())
}
