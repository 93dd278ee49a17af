use serde_json::Value;
use tracing::instrument;

use crate::domain::{
    authentication::value_objects::Identity,
    common::{entities::app_errors::CoreError, services::Service},
    feedback::{
        entities::FeedbackEntry, ports::FeedbackService, value_objects::SubmitFeedbackInput,
    },
    storage::{
        entities::{Collection, Document},
        ports::DocumentStore,
    },
};

impl<S, LLM, V, A> FeedbackService for Service<S, LLM, V, A>
where
    S: DocumentStore,
    LLM: Send + Sync,
    V: Send + Sync,
    A: Send + Sync,
{
    #[instrument(skip(self, input), fields(uid = %identity))]
    async fn submit_feedback(
        &self,
        identity: Identity,
        input: SubmitFeedbackInput,
    ) -> Result<String, CoreError> {
        let recipe_name = input.recipe_name.trim();
        let feedback_type = input.feedback_type.trim();

        if recipe_name.is_empty() || feedback_type.is_empty() {
            return Err(CoreError::Invalid(
                "recipe_name and feedback_type are required".to_string(),
            ));
        }

        let mut entry = Document::new();
        entry.insert("recipe_name".to_string(), Value::String(recipe_name.to_string()));
        entry.insert("feedback_type".to_string(), Value::String(feedback_type.to_string()));

        let id = self
            .document_store
            .append(
                &identity,
                Collection::Feedback,
                entry,
                Collection::Feedback.retention_cap(),
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to store feedback");
                CoreError::from(e)
            })?;

        tracing::info!(feedback_id = %id, feedback_type, "feedback submitted");

        Ok(id)
    }

    #[instrument(skip(self), fields(uid = %identity))]
    async fn list_feedback(
        &self,
        identity: Identity,
        limit: Option<usize>,
    ) -> Result<Vec<FeedbackEntry>, CoreError> {
        let cap = Collection::Feedback.retention_cap();
        let limit = match (limit, cap) {
            (Some(limit), Some(cap)) => Some(limit.min(cap)),
            (limit, cap) => limit.or(cap),
        };

        let documents = self
            .document_store
            .list(&identity, Collection::Feedback, limit)
            .await?;

        Ok(documents
            .iter()
            .filter_map(FeedbackEntry::from_document)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StaticVerifier, identity, test_service};

    fn input(recipe_name: &str, feedback_type: &str) -> SubmitFeedbackInput {
        SubmitFeedbackInput {
            recipe_name: recipe_name.to_string(),
            feedback_type: feedback_type.to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_then_list_newest_first() {
        let (service, _dir) = test_service(StaticVerifier::rejecting());
        let user = identity("user-1");

        service
            .submit_feedback(user.clone(), input("Soup", "liked"))
            .await
            .expect("first");
        service
            .submit_feedback(user.clone(), input(" Stew ", "too_hard"))
            .await
            .expect("second");

        let entries = service.list_feedback(user, None).await.expect("list");

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].recipe_name, "Stew");
        assert_eq!(entries[0].feedback_type, "too_hard");
        assert!(entries[0].created_at.is_some());
        assert_eq!(entries[1].recipe_name, "Soup");
    }

    #[tokio::test]
    async fn test_blank_fields_are_rejected() {
        let (service, _dir) = test_service(StaticVerifier::rejecting());
        let user = identity("user-1");

        let missing_name = service.submit_feedback(user.clone(), input("  ", "liked")).await;
        let missing_type = service.submit_feedback(user, input("Soup", "")).await;

        assert!(matches!(missing_name, Err(CoreError::Invalid(_))));
        assert!(matches!(missing_type, Err(CoreError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_retention_keeps_the_latest_hundred() {
        let (service, _dir) = test_service(StaticVerifier::rejecting());
        let user = identity("user-1");

        for n in 0..105 {
            service
                .submit_feedback(user.clone(), input(&format!("Recipe {n}"), "liked"))
                .await
                .expect("submit");
        }

        let entries = service.list_feedback(user, Some(500)).await.expect("list");
        assert_eq!(entries.len(), 100);
        assert_eq!(entries[0].recipe_name, "Recipe 104");
    }
}
