use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct SubmitFeedbackValidator {
    #[validate(length(
        min = 1,
        max = 200,
        message = "recipe_name must be between 1 and 200 characters"
    ))]
    pub recipe_name: String,
    #[validate(length(
        min = 1,
        max = 50,
        message = "feedback_type must be between 1 and 50 characters"
    ))]
    pub feedback_type: String,
}

#[derive(Debug, Serialize, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListFeedbackParams {
    #[schema(example = 20)]
    pub limit: Option<usize>,
}
