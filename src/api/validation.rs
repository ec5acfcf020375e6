use super::ApiError;

pub fn validate_endpoint_url(url: &str) -> Result<&str, ApiError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Endpoint URL cannot be empty"));
    }

    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(ApiError::validation(
            "Endpoint URL must start with http:// or https://",
        ));
    }

    Ok(trimmed)
}

pub fn validate_ad_position(position: &str) -> Result<&str, ApiError> {
    match position {
        "header" | "footer" | "sidebar" => Ok(position),
        _ => Err(ApiError::validation(format!(
            "Invalid ad position: {}. Position must be header, footer, or sidebar",
            position
        ))),
    }
}

pub fn validate_ad_type(slot_type: &str) -> Result<&str, ApiError> {
    match slot_type {
        "html" | "image" => Ok(slot_type),
        _ => Err(ApiError::validation(format!(
            "Invalid ad type: {}. Type must be html or image",
            slot_type
        ))),
    }
}

/// Target URLs for the stream proxy must be absolute http(s) URLs so the
/// proxy cannot be pointed at local files or other schemes.
pub fn validate_proxy_url(url: &str) -> Result<url::Url, ApiError> {
    let parsed = url::Url::parse(url)
        .map_err(|_| ApiError::validation(format!("Invalid stream URL: {}", url)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(ApiError::validation(format!(
            "Unsupported stream URL scheme: {}",
            scheme
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_endpoint_url() {
        assert!(validate_endpoint_url("https://api.example.com/v1").is_ok());
        assert!(validate_endpoint_url("http://localhost:3001").is_ok());
        assert!(validate_endpoint_url("").is_err());
        assert!(validate_endpoint_url("   ").is_err());
        assert!(validate_endpoint_url("ftp://api.example.com").is_err());
        assert!(validate_endpoint_url("api.example.com").is_err());
    }

    #[test]
    fn test_validate_ad_position() {
        assert!(validate_ad_position("header").is_ok());
        assert!(validate_ad_position("footer").is_ok());
        assert!(validate_ad_position("sidebar").is_ok());
        assert!(validate_ad_position("banner").is_err());
        assert!(validate_ad_position("").is_err());
    }

    #[test]
    fn test_validate_ad_type() {
        assert!(validate_ad_type("html").is_ok());
        assert!(validate_ad_type("image").is_ok());
        assert!(validate_ad_type("script").is_err());
    }

    #[test]
    fn test_validate_proxy_url() {
        assert!(validate_proxy_url("https://cdn.example.com/video.mp4").is_ok());
        assert!(validate_proxy_url("http://cdn.example.com/video.mp4").is_ok());
        assert!(validate_proxy_url("file:///etc/passwd").is_err());
        assert!(validate_proxy_url("javascript:alert(1)").is_err());
        assert!(validate_proxy_url("not a url").is_err());
    }
}
