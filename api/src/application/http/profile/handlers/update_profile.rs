use nutrisnap_core::domain::profile::ports::ProfileService;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::{
    auth::{ReadyService, RequiredIdentity},
    http::{
        profile::validators::UpdateProfileValidator,
        server::api_entities::{
            api_error::{ApiError, ValidateJson},
            response::Response,
        },
    },
};

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UpdateProfileResponse {
    pub message: String,
}

#[utoipa::path(
    put,
    path = "",
    tag = "profile",
    summary = "Update profile",
    description = "Shallow-merges the given keys into the stored profile.",
    request_body = UpdateProfileValidator,
    responses(
        (status = 200, body = UpdateProfileResponse),
        (status = 400, description = "Invalid body"),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer" = []))
)]
pub async fn update_profile(
    RequiredIdentity(identity): RequiredIdentity,
    ReadyService(service): ReadyService,
    ValidateJson(payload): ValidateJson<UpdateProfileValidator>,
) -> Result<Response<UpdateProfileResponse>, ApiError> {
    service
        .update_profile(identity, payload.profile)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(UpdateProfileResponse {
        message: "Profile updated".to_string(),
    }))
}
