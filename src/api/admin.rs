use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{validate_ad_position, validate_ad_type, validate_endpoint_url};
use super::{AdSlotDto, ApiError, ApiResponse, AppState, EndpointDto, HealthResponse, SiteSettingsDto};
use crate::constants::defaults;
use crate::db::AdSlotInput;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct EndpointRequest {
    pub url: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct AdSlotRequest {
    pub name: String,
    pub position: String,
    #[serde(rename = "type")]
    pub slot_type: String,
    pub content: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub site_name: Option<String>,
    pub site_description: Option<String>,
}

// ============================================================================
// Health
// ============================================================================

/// GET /admin/api/health
///
/// Probe that checks database connectivity.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let db_ready = state.store().ping().await.is_ok();

    let status = if db_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ApiResponse::success(HealthResponse {
            status: if db_ready { "ok" } else { "degraded" }.to_string(),
            database: if db_ready { "connected" } else { "unreachable" }.to_string(),
            uptime_seconds: state.start_time.elapsed().as_secs(),
            version: env!("CARGO_PKG_VERSION"),
        })),
    )
        .into_response()
}

// ============================================================================
// API Endpoints
// ============================================================================

pub async fn list_endpoints(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<EndpointDto>>>, ApiError> {
    let endpoints = state
        .store()
        .list_api_endpoints()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let dtos = endpoints.into_iter().map(EndpointDto::from).collect();

    Ok(Json(ApiResponse::success(dtos)))
}

pub async fn add_endpoint(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EndpointRequest>,
) -> Result<Json<ApiResponse<EndpointDto>>, ApiError> {
    let url = validate_endpoint_url(&payload.url)?;

    let endpoint = state
        .store()
        .add_api_endpoint(url, payload.is_active)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(EndpointDto::from(endpoint))))
}

pub async fn update_endpoint(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<EndpointRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let url = validate_endpoint_url(&payload.url)?;

    let updated = state
        .store()
        .update_api_endpoint(id, url, payload.is_active)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    if !updated {
        return Err(ApiError::not_found("API endpoint", id));
    }

    Ok(Json(ApiResponse::success(())))
}

pub async fn delete_endpoint(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let deleted = state
        .store()
        .delete_api_endpoint(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    if !deleted {
        return Err(ApiError::not_found("API endpoint", id));
    }

    Ok(Json(ApiResponse::success(())))
}

// ============================================================================
// Ad Slots
// ============================================================================

pub async fn list_ads(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<AdSlotDto>>>, ApiError> {
    let slots = state
        .store()
        .list_ad_slots()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let dtos = slots.into_iter().map(AdSlotDto::from).collect();

    Ok(Json(ApiResponse::success(dtos)))
}

pub async fn add_ad(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AdSlotRequest>,
) -> Result<Json<ApiResponse<AdSlotDto>>, ApiError> {
    let input = validate_ad_slot(payload)?;

    let slot = state
        .store()
        .add_ad_slot(input)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(AdSlotDto::from(slot))))
}

pub async fn update_ad(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<AdSlotRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let input = validate_ad_slot(payload)?;

    let updated = state
        .store()
        .update_ad_slot(id, input)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    if !updated {
        return Err(ApiError::not_found("Ad slot", id));
    }

    Ok(Json(ApiResponse::success(())))
}

pub async fn delete_ad(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let deleted = state
        .store()
        .delete_ad_slot(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    if !deleted {
        return Err(ApiError::not_found("Ad slot", id));
    }

    Ok(Json(ApiResponse::success(())))
}

fn validate_ad_slot(payload: AdSlotRequest) -> Result<AdSlotInput, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("Ad slot name cannot be empty"));
    }
    validate_ad_position(&payload.position)?;
    validate_ad_type(&payload.slot_type)?;

    Ok(AdSlotInput {
        name: payload.name,
        position: payload.position,
        slot_type: payload.slot_type,
        content: payload.content,
        is_active: payload.is_active,
    })
}

// ============================================================================
// Site Settings
// ============================================================================

pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SiteSettingsDto>>, ApiError> {
    let store = state.store();

    let site_name = store
        .get_setting("site_name")
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .unwrap_or_else(|| defaults::SITE_NAME.to_string());

    let site_description = store
        .get_setting("site_description")
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .unwrap_or_else(|| defaults::SITE_DESCRIPTION.to_string());

    Ok(Json(ApiResponse::success(SiteSettingsDto {
        site_name,
        site_description,
    })))
}

pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<Json<ApiResponse<SiteSettingsDto>>, ApiError> {
    let store = state.store();

    if let Some(site_name) = &payload.site_name {
        if site_name.trim().is_empty() {
            return Err(ApiError::validation("Site name cannot be empty"));
        }
        store
            .set_setting("site_name", site_name)
            .await
            .map_err(|e| ApiError::internal(e.to_string()))?;
    }

    if let Some(site_description) = &payload.site_description {
        store
            .set_setting("site_description", site_description)
            .await
            .map_err(|e| ApiError::internal(e.to_string()))?;
    }

    get_settings(State(state)).await
}
