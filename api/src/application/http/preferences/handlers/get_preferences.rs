use nutrisnap_core::domain::preferences::{entities::UserPreferences, ports::PreferenceService};

use crate::application::{
    auth::{ReadyService, RequiredIdentity},
    http::server::api_entities::{api_error::ApiError, response::Response},
};

#[utoipa::path(
    get,
    path = "",
    tag = "preferences",
    summary = "Get preferences",
    description = "Returns the caller's stored preferences merged over the defaults.",
    responses(
        (status = 200, body = UserPreferences),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer" = []))
)]
pub async fn get_preferences(
    RequiredIdentity(identity): RequiredIdentity,
    ReadyService(service): ReadyService,
) -> Result<Response<UserPreferences>, ApiError> {
    let preferences = service.resolve_preferences(Some(identity)).await;

    Ok(Response::OK(preferences))
}
