use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::constants::messages;
use crate::views;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    ExternalApiError { service: String, message: String },

    ValidationError(String),

    InternalError(String),

    Unauthorized(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ExternalApiError { service, message } => {
                write!(f, "{} error: {}", service, message)
            }
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::ExternalApiError { service, message } => {
                tracing::warn!("{} error: {}", service, message);
                (
                    StatusCode::BAD_GATEWAY,
                    format!("{} is unavailable", service),
                )
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ApiError::NotFound(format!("{} {} not found", resource, id))
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        ApiError::ExternalApiError {
            service: "Upstream".to_string(),
            message: msg.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}

/// Failure for the HTML routes. Unlike [`ApiError`] this renders a full
/// error page, so the visitor never sees a JSON body.
#[derive(Debug)]
pub enum PageError {
    NotFound {
        title: &'static str,
        message: &'static str,
    },

    Internal {
        message: &'static str,
    },
}

impl PageError {
    pub const fn anime_not_found() -> Self {
        PageError::NotFound {
            title: messages::ANIME_NOT_FOUND_TITLE,
            message: messages::ANIME_NOT_FOUND,
        }
    }

    pub const fn episode_not_found() -> Self {
        PageError::NotFound {
            title: messages::EPISODE_NOT_FOUND_TITLE,
            message: messages::EPISODE_NOT_FOUND,
        }
    }

    pub const fn internal(message: &'static str) -> Self {
        PageError::Internal { message }
    }
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::NotFound { message, .. } => write!(f, "Not found: {}", message),
            PageError::Internal { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for PageError {}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound { title, message } => (
                StatusCode::NOT_FOUND,
                views::error_page(title, 404, message),
            )
                .into_response(),
            PageError::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                views::error_page(messages::ERROR_TITLE, 500, message),
            )
                .into_response(),
        }
    }
}
