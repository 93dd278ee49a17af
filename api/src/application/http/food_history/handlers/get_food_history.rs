use nutrisnap_core::domain::food_history::{entities::HistoryEntry, ports::FoodHistoryService};

use crate::application::{
    auth::{ReadyService, RequiredIdentity},
    http::server::api_entities::{api_error::ApiError, response::Response},
};

#[utoipa::path(
    get,
    path = "",
    tag = "food-history",
    summary = "Get food history",
    description = "Returns the caller's most recent analyses, newest first, at most 50.",
    responses(
        (status = 200, body = Vec<HistoryEntry>),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer" = []))
)]
pub async fn get_food_history(
    RequiredIdentity(identity): RequiredIdentity,
    ReadyService(service): ReadyService,
) -> Result<Response<Vec<HistoryEntry>>, ApiError> {
    let history = service
        .get_food_history(identity)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(history))
}
