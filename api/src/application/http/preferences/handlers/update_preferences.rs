use nutrisnap_core::domain::preferences::{entities::UserPreferences, ports::PreferenceService};
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
pub struct UpdatePreferencesResponse {
    pub message: String,
    pub preferences: UserPreferences,
}

#[utoipa::path(
    put,
    path = "",
    tag = "preferences",
    summary = "Update preferences",
    description = "Merges the given keys into the stored preferences. Keys not sent keep their value.",
    request_body(content = Object, description = "Preference keys and values"),
    responses(
        (status = 200, body = UpdatePreferencesResponse),
        (status = 400, description = "Body is not a JSON object"),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer" = []))
)]
pub async fn update_preferences(
    RequiredIdentity(identity): RequiredIdentity,
    ReadyService(service): ReadyService,
    JsonObject(payload): JsonObject,
) -> Result<Response<UpdatePreferencesResponse>, ApiError> {
    let preferences = service
        .update_preferences(identity, payload)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(UpdatePreferencesResponse {
        message: "Preferences updated".to_string(),
        preferences,
    }))
}
