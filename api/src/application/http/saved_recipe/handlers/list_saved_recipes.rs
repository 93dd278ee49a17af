use nutrisnap_core::domain::saved_recipe::{entities::SavedRecipe, ports::SavedRecipeService};

use crate::application::{
    auth::{ReadyService, RequiredIdentity},
    http::server::api_entities::{api_error::ApiError, response::Response},
};

#[utoipa::path(
    get,
    path = "",
    tag = "saved-recipes",
    summary = "List saved recipes",
    description = "Returns the caller's saved recipes, newest first. Each recipe carries its id and saved_at.",
    responses(
        (status = 200, description = "Saved recipes", content_type = "application/json"),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer" = []))
)]
pub async fn list_saved_recipes(
    RequiredIdentity(identity): RequiredIdentity,
    ReadyService(service): ReadyService,
) -> Result<Response<Vec<SavedRecipe>>, ApiError> {
    let recipes = service
        .list_saved_recipes(identity)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(recipes))
}
