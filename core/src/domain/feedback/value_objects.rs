#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitFeedbackInput {
    pub recipe_name: String,
    pub feedback_type: String,
}
