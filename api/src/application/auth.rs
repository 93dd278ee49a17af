use axum::{
    RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use nutrisnap_core::{
    application::NutrisnapService,
    domain::{authentication::ports::AuthService, authentication::value_objects::Identity},
};

use super::http::server::{api_entities::api_error::ApiError, app_state::AppState};

const AUTH_REQUIRED: &str = "Authentication required";

/// Bearer token of the request, if any.
pub async fn extract_token_from_bearer(parts: &mut Parts) -> Option<String> {
    let TypedHeader(Authorization(bearer)) = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .ok()?;

    let token = bearer.token().trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// The configured service. Rejects with the configuration error when the
/// backend booted degraded.
pub struct ReadyService(pub NutrisnapService);

impl<S> FromRequestParts<S> for ReadyService
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let service = app_state.service().map_err(ApiError::from)?;
        Ok(ReadyService(service.clone()))
    }
}

/// Identity when a valid token is sent. A missing or invalid token is a
/// guest.
pub struct OptionalIdentity(pub Option<Identity>);

impl<S> FromRequestParts<S> for OptionalIdentity
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = extract_token_from_bearer(parts).await else {
            return Ok(OptionalIdentity(None));
        };

        let app_state = AppState::from_ref(state);
        let Ok(service) = app_state.service() else {
            return Ok(OptionalIdentity(None));
        };

        match service.authenticate(token).await {
            Ok(identity) => Ok(OptionalIdentity(Some(identity))),
            Err(e) => {
                tracing::debug!("Ignoring invalid token on optional route: {}", e);
                Ok(OptionalIdentity(None))
            }
        }
    }
}

/// Identity from a valid bearer token; anything else is 401.
pub struct RequiredIdentity(pub Identity);

impl<S> FromRequestParts<S> for RequiredIdentity
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_token_from_bearer(parts)
            .await
            .ok_or_else(|| ApiError::Unauthorized(AUTH_REQUIRED.to_string()))?;

        let app_state = AppState::from_ref(state);
        let service = app_state.service().map_err(ApiError::from)?;

        let identity = service.authenticate(token).await.map_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
            ApiError::Unauthorized(AUTH_REQUIRED.to_string())
        })?;

        Ok(RequiredIdentity(identity))
    }
}
