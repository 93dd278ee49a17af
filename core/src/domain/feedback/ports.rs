use std::future::Future;

use crate::domain::{
    authentication::value_objects::Identity,
    common::entities::app_errors::CoreError,
    feedback::{entities::FeedbackEntry, value_objects::SubmitFeedbackInput},
};

#[cfg_attr(test, mockall::automock)]
pub trait FeedbackService: Send + Sync {
    /// Appends a feedback entry and returns its id.
    fn submit_feedback(
        &self,
        identity: Identity,
        input: SubmitFeedbackInput,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;

    /// Newest first, capped at the collection's retention.
    fn list_feedback(
        &self,
        identity: Identity,
        limit: Option<usize>,
    ) -> impl Future<Output = Result<Vec<FeedbackEntry>, CoreError>> + Send;
}
