use crate::application::http::server::api_entities::api_error::ApiError;

pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Checks an uploaded image part and returns its MIME type.
pub fn validate_image(content_type: Option<&str>, size: usize) -> Result<String, ApiError> {
    let mime_type = content_type
        .map(|ct| ct.split(';').next().unwrap_or_default().trim().to_ascii_lowercase())
        .unwrap_or_default();

    if !mime_type.starts_with("image/") {
        return Err(ApiError::BadRequest(
            "Uploaded file must be an image".to_string(),
        ));
    }

    if size == 0 {
        return Err(ApiError::BadRequest("Uploaded image is empty".to_string()));
    }

    if size > MAX_IMAGE_SIZE {
        return Err(ApiError::PayloadTooLarge(format!(
            "Image too large. Max size is {} bytes",
            MAX_IMAGE_SIZE
        )));
    }

    Ok(mime_type)
}
