use serde_json::Value;
use tracing::instrument;

use crate::domain::{
    authentication::value_objects::Identity,
    common::{entities::app_errors::CoreError, services::Service},
    preferences::{entities::UserPreferences, ports::PreferenceService},
    storage::{
        entities::{Document, PREFERENCES_FIELD},
        ports::DocumentStore,
        value_objects::WriteMode,
    },
};

impl<S, LLM, V, A> PreferenceService for Service<S, LLM, V, A>
where
    S: DocumentStore,
    LLM: Send + Sync,
    V: Send + Sync,
    A: Send + Sync,
{
    #[instrument(skip(self))]
    async fn resolve_preferences(&self, identity: Option<Identity>) -> UserPreferences {
        let Some(identity) = identity else {
            return UserPreferences::defaults();
        };

        match self.document_store.get_record(&identity).await {
            Ok(record) => UserPreferences::resolve(&record.preferences),
            Err(e) => {
                tracing::warn!(uid = %identity, error = %e, "could not load preferences, using defaults");
                UserPreferences::defaults()
            }
        }
    }

    #[instrument(skip(self, incoming), fields(uid = %identity))]
    async fn update_preferences(
        &self,
        identity: Identity,
        incoming: Document,
    ) -> Result<UserPreferences, CoreError> {
        let record = self.document_store.get_record(&identity).await?;
        let merged = UserPreferences::resolve(&record.preferences).merged_with(&incoming);

        let mut fields = Document::new();
        fields.insert(
            PREFERENCES_FIELD.to_string(),
            Value::Object(merged.to_document()),
        );

        self.document_store
            .set_fields(&identity, fields, WriteMode::Merge)
            .await?;

        tracing::info!(keys = merged.len(), "preferences updated");

        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::storage::entities::{StoreErrorKind, into_object},
        testing::{StaticVerifier, failing_store_service, identity, test_service},
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_guest_gets_defaults() {
        let (service, _dir) = test_service(StaticVerifier::rejecting());
        assert_eq!(service.resolve_preferences(None).await, UserPreferences::defaults());
    }

    #[tokio::test]
    async fn test_unknown_user_gets_defaults() {
        let (service, _dir) = test_service(StaticVerifier::rejecting());
        let prefs = service.resolve_preferences(Some(identity("new-user"))).await;
        assert_eq!(prefs, UserPreferences::defaults());
    }

    #[tokio::test]
    async fn test_storage_failure_degrades_to_defaults() {
        let service = failing_store_service(StoreErrorKind::Internal);
        let prefs = service.resolve_preferences(Some(identity("user-1"))).await;
        assert_eq!(prefs, UserPreferences::defaults());
    }

    #[tokio::test]
    async fn test_partial_updates_accumulate() {
        let (service, _dir) = test_service(StaticVerifier::rejecting());
        let user = identity("user-1");

        service
            .update_preferences(user.clone(), into_object(json!({"diet_type": "vegan"})))
            .await
            .expect("first update");
        let updated = service
            .update_preferences(
                user.clone(),
                into_object(json!({"allergies": "peanuts", "has_onboarded": true})),
            )
            .await
            .expect("second update");

        let resolved = service.resolve_preferences(Some(user)).await;

        assert_eq!(resolved, updated);
        assert_eq!(resolved.get("diet_type"), Some("vegan"));
        assert_eq!(resolved.get("allergies"), Some("peanuts"));
        assert_eq!(resolved.get("has_onboarded"), Some("true"));
        assert_eq!(resolved.get("fitness_goal"), Some("general health"));
    }

    #[tokio::test]
    async fn test_update_keeps_profile_untouched() {
        let (service, _dir) = test_service(StaticVerifier::rejecting());
        let user = identity("user-1");

        service
            .document_store
            .set_fields(
                &user,
                into_object(json!({"profile": {"name": "Ana"}})),
                WriteMode::Merge,
            )
            .await
            .expect("profile");
        service
            .update_preferences(user.clone(), into_object(json!({"cooking_time": "quick"})))
            .await
            .expect("update");

        let record = service.document_store.get_record(&user).await.expect("record");
        assert_eq!(record.profile.get("name"), Some(&json!("Ana")));
    }

    #[tokio::test]
    async fn test_update_propagates_storage_failures() {
        let service = failing_store_service(StoreErrorKind::Internal);
        let result = service
            .update_preferences(identity("user-1"), into_object(json!({"diet_type": "vegan"})))
            .await;

        assert!(matches!(result, Err(CoreError::StorageFatal(_))));
    }
}
