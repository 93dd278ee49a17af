use nutrisnap_core::domain::saved_recipe::ports::SavedRecipeService;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::{
    auth::{ReadyService, RequiredIdentity},
    http::server::api_entities::{
        api_error::{ApiError, JsonObject},
        response::Response,
    },
};

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SaveRecipeResponse {
    pub id: String,
    pub message: String,
}

#[utoipa::path(
    post,
    path = "",
    tag = "saved-recipes",
    summary = "Save recipe",
    description = "Stores a recipe object as sent by the client under a new id.",
    request_body(content = Object, description = "Recipe to save"),
    responses(
        (status = 200, body = SaveRecipeResponse),
        (status = 400, description = "Body is empty or not a JSON object"),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer" = []))
)]
pub async fn save_recipe(
    RequiredIdentity(identity): RequiredIdentity,
    ReadyService(service): ReadyService,
    JsonObject(recipe): JsonObject,
) -> Result<Response<SaveRecipeResponse>, ApiError> {
    let id = service
        .save_recipe(identity, recipe)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(SaveRecipeResponse {
        id,
        message: "Recipe saved".to_string(),
    }))
}
