use nutrisnap_core::domain::feedback::{
    ports::FeedbackService, value_objects::SubmitFeedbackInput,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::{
    auth::{ReadyService, RequiredIdentity},
    http::{
        feedback::validators::SubmitFeedbackValidator,
        server::api_entities::{
            api_error::{ApiError, ValidateJson},
            response::Response,
        },
    },
};

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SubmitFeedbackResponse {
    pub message: String,
}

#[utoipa::path(
    post,
    path = "",
    tag = "feedback",
    summary = "Submit feedback",
    description = "Records how the caller rated a suggested recipe.",
    request_body = SubmitFeedbackValidator,
    responses(
        (status = 200, body = SubmitFeedbackResponse),
        (status = 400, description = "Missing recipe_name or feedback_type"),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer" = []))
)]
pub async fn submit_feedback(
    RequiredIdentity(identity): RequiredIdentity,
    ReadyService(service): ReadyService,
    ValidateJson(payload): ValidateJson<SubmitFeedbackValidator>,
) -> Result<Response<SubmitFeedbackResponse>, ApiError> {
    service
        .submit_feedback(
            identity,
            SubmitFeedbackInput {
                recipe_name: payload.recipe_name,
                feedback_type: payload.feedback_type,
            },
        )
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(SubmitFeedbackResponse {
        message: "Feedback submitted".to_string(),
    }))
}
