use axum::{
    body::Body,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::api::validation::validate_proxy_url;

/// Response headers mirrored back to the player. Everything else from the
/// upstream is dropped.
const FORWARDED_HEADERS: [&str; 4] = [
    "content-type",
    "content-length",
    "accept-ranges",
    "content-range",
];

#[derive(Deserialize)]
pub struct StreamQuery {
    pub url: String,
}

/// GET /stream?url=...
///
/// Proxies a remote video URL so playback stays on the portal origin. Range
/// requests pass through to the upstream, and its status code is mirrored
/// back so the player can seek.
pub async fn proxy_stream(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StreamQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let target = validate_proxy_url(&query.url)?;

    let profile = state.config().read().await.upstream.fetch_profile.clone();

    let range_header = headers
        .get("range")
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("bytes=0-"));

    let mut request = state
        .http()
        .get(target)
        .header(reqwest::header::USER_AGENT, &profile.user_agent)
        .header(reqwest::header::RANGE, range_header.as_bytes());

    for (name, value) in &profile.headers {
        request = request.header(name, value);
    }

    let upstream = request
        .send()
        .await
        .map_err(|e| ApiError::upstream(e.to_string()))?;

    let status = StatusCode::from_u16(upstream.status().as_u16())
        .map_err(|e| ApiError::internal(format!("Invalid upstream status: {e}")))?;

    let mut response = Response::builder().status(status);
    for name in FORWARDED_HEADERS {
        if let Some(value) = upstream.headers().get(name)
            && let Ok(value) = HeaderValue::from_bytes(value.as_bytes())
        {
            response = response.header(name, value);
        }
    }

    response
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|e| ApiError::internal(format!("Failed to build response: {e}")))
}
