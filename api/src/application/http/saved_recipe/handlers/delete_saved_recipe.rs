use axum::extract::Path;
use nutrisnap_core::domain::saved_recipe::ports::SavedRecipeService;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::{
    auth::{ReadyService, RequiredIdentity},
    http::server::api_entities::{api_error::ApiError, response::Response},
};

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct DeleteSavedRecipeResponse {
    pub message: String,
}

#[utoipa::path(
    delete,
    path = "/{recipe_id}",
    tag = "saved-recipes",
    summary = "Delete saved recipe",
    description = "Removes a saved recipe. Deleting an unknown id succeeds.",
    params(
        ("recipe_id" = String, Path, description = "Saved recipe id"),
    ),
    responses(
        (status = 200, body = DeleteSavedRecipeResponse),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer" = []))
)]
pub async fn delete_saved_recipe(
    RequiredIdentity(identity): RequiredIdentity,
    ReadyService(service): ReadyService,
    Path(recipe_id): Path<String>,
) -> Result<Response<DeleteSavedRecipeResponse>, ApiError> {
    service
        .delete_saved_recipe(identity, recipe_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(DeleteSavedRecipeResponse {
        message: "Recipe deleted".to_string(),
    }))
}
