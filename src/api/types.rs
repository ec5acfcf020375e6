use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EndpointDto {
    pub id: i32,
    pub url: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<crate::db::ApiEndpoint> for EndpointDto {
    fn from(model: crate::db::ApiEndpoint) -> Self {
        Self {
            id: model.id,
            url: model.url,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdSlotDto {
    pub id: i32,
    pub name: String,
    pub position: String,
    #[serde(rename = "type")]
    pub slot_type: String,
    pub content: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<crate::db::AdSlot> for AdSlotDto {
    fn from(model: crate::db::AdSlot) -> Self {
        Self {
            id: model.id,
            name: model.name,
            position: model.position,
            slot_type: model.slot_type,
            content: model.content,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SiteSettingsDto {
    pub site_name: String,
    pub site_description: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub uptime_seconds: u64,
    pub version: &'static str,
}
