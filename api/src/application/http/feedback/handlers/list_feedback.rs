use axum::extract::Query;
use nutrisnap_core::domain::feedback::{entities::FeedbackEntry, ports::FeedbackService};

use crate::application::{
    auth::{ReadyService, RequiredIdentity},
    http::{
        feedback::validators::ListFeedbackParams,
        server::api_entities::{api_error::ApiError, response::Response},
    },
};

#[utoipa::path(
    get,
    path = "",
    tag = "feedback",
    summary = "List feedback",
    description = "Returns the caller's feedback, newest first, at most 100.",
    params(ListFeedbackParams),
    responses(
        (status = 200, body = Vec<FeedbackEntry>),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer" = []))
)]
pub async fn list_feedback(
    RequiredIdentity(identity): RequiredIdentity,
    ReadyService(service): ReadyService,
    Query(params): Query<ListFeedbackParams>,
) -> Result<Response<Vec<FeedbackEntry>>, ApiError> {
    let feedback = service
        .list_feedback(identity, params.limit)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(feedback))
}
