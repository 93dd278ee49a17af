use nutrisnap_core::domain::profile::{entities::UserProfile, ports::ProfileService};

use crate::application::{
    auth::{ReadyService, RequiredIdentity},
    http::server::api_entities::{api_error::ApiError, response::Response},
};

#[utoipa::path(
    get,
    path = "",
    tag = "profile",
    summary = "Get profile",
    description = "Returns the caller's uid, stored profile and merged preferences.",
    responses(
        (status = 200, body = UserProfile),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer" = []))
)]
pub async fn get_profile(
    RequiredIdentity(identity): RequiredIdentity,
    ReadyService(service): ReadyService,
) -> Result<Response<UserProfile>, ApiError> {
    let profile = service.get_profile(identity).await.map_err(ApiError::from)?;

    Ok(Response::OK(profile))
}
