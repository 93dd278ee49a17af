use tracing::instrument;

use crate::domain::{
    authentication::value_objects::Identity,
    common::{entities::app_errors::CoreError, services::Service},
    food_analysis::entities::RecipeAnalysis,
    food_history::{
        entities::{HistoryEntry, history_document},
        ports::FoodHistoryService,
    },
    preferences::entities::UserPreferences,
    storage::{entities::Collection, ports::DocumentStore},
};

impl<S, LLM, V, A> FoodHistoryService for Service<S, LLM, V, A>
where
    S: DocumentStore,
    LLM: Send + Sync,
    V: Send + Sync,
    A: Send + Sync,
{
    #[instrument(skip(self), fields(uid = %identity))]
    async fn get_food_history(&self, identity: Identity) -> Result<Vec<HistoryEntry>, CoreError> {
        let documents = self
            .document_store
            .list(
                &identity,
                Collection::FoodHistory,
                Collection::FoodHistory.retention_cap(),
            )
            .await?;

        Ok(documents
            .iter()
            .filter_map(HistoryEntry::from_document)
            .collect())
    }

    #[instrument(skip(self, analysis, preferences_used), fields(uid = %identity))]
    async fn record_analysis(
        &self,
        identity: Identity,
        analysis: RecipeAnalysis,
        preferences_used: UserPreferences,
    ) -> Result<String, CoreError> {
        let recipes_generated = analysis.recipe_names();
        let document = history_document(
            &analysis.detected_ingredients,
            recipes_generated,
            &preferences_used,
        );

        let id = self
            .document_store
            .append(
                &identity,
                Collection::FoodHistory,
                document,
                Collection::FoodHistory.retention_cap(),
            )
            .await?;

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            preferences::ports::PreferenceService, storage::entities::into_object,
        },
        testing::{StaticVerifier, identity, sample_analysis, test_service},
    };
    use serde_json::json;

    #[tokio::test]
    async fn test_history_keeps_the_snapshot_after_preferences_change() {
        let (service, _dir) = test_service(StaticVerifier::rejecting());
        let user = identity("user-1");

        let before = service
            .update_preferences(user.clone(), into_object(json!({"diet_type": "vegan"})))
            .await
            .expect("update");
        service
            .record_analysis(user.clone(), sample_analysis(&["Tofu Bowl"]), before)
            .await
            .expect("record");
        service
            .update_preferences(user.clone(), into_object(json!({"diet_type": "keto"})))
            .await
            .expect("update");

        let history = service.get_food_history(user).await.expect("history");

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].preferences_used.get("diet_type"), Some("vegan"));
        assert_eq!(history[0].recipes_generated, vec!["Tofu Bowl".to_string()]);
        assert!(history[0].analyzed_at.is_some());
    }

    #[tokio::test]
    async fn test_history_is_capped_at_fifty() {
        let (service, _dir) = test_service(StaticVerifier::rejecting());
        let user = identity("user-1");

        for n in 0..55 {
            service
                .record_analysis(
                    user.clone(),
                    sample_analysis(&[&format!("Recipe {n}")]),
                    UserPreferences::defaults(),
                )
                .await
                .expect("record");
        }

        let history = service.get_food_history(user).await.expect("history");
        assert_eq!(history.len(), 50);
        assert_eq!(history[0].recipes_generated, vec!["Recipe 54".to_string()]);
    }
}
