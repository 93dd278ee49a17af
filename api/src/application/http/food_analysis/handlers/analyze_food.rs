use axum::extract::Multipart;
use bytes::Bytes;
use nutrisnap_core::domain::food_analysis::{
    entities::RecipeAnalysis,
    ports::FoodAnalysisService,
    value_objects::{AnalyzeFoodInput, ImageInput},
};

use crate::application::{
    auth::{OptionalIdentity, ReadyService},
    http::{
        food_analysis::validators::validate_image,
        server::api_entities::{api_error::ApiError, response::Response},
    },
};

#[utoipa::path(
    post,
    path = "",
    tag = "food-analysis",
    summary = "Analyze food from image",
    description = "Detects ingredients in a photo and suggests recipes tailored to the caller's preferences. Guests get default preferences and no history.",
    request_body(content_type = "multipart/form-data", description = "Form with an `image` file field"),
    responses(
        (status = 200, body = RecipeAnalysis),
        (status = 400, description = "Missing or invalid image, or too few ingredients detected"),
        (status = 413, description = "Image larger than 10MB"),
        (status = 502, description = "Model call failed")
    ),
    security((), ("bearer" = []))
)]
pub async fn analyze_food(
    ReadyService(service): ReadyService,
    OptionalIdentity(identity): OptionalIdentity,
    mut multipart: Multipart,
) -> Result<Response<RecipeAnalysis>, ApiError> {
    let mut image: Option<ImageInput> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        let data: Bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read image: {}", e)))?;

        let mime_type = validate_image(content_type.as_deref(), data.len())?;
        image = Some(ImageInput { data, mime_type });
    }

    let image = image.ok_or_else(|| ApiError::BadRequest("Missing image field".to_string()))?;

    let analysis = service
        .analyze_food(identity, AnalyzeFoodInput { image })
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(analysis))
}
