use serde_json::Value;
use tracing::instrument;

use crate::domain::{
    authentication::value_objects::Identity,
    common::{entities::app_errors::CoreError, services::Service},
    preferences::entities::UserPreferences,
    profile::{entities::UserProfile, ports::ProfileService},
    storage::{
        entities::{Document, PROFILE_FIELD},
        ports::DocumentStore,
        value_objects::WriteMode,
    },
};

impl<S, LLM, V, A> ProfileService for Service<S, LLM, V, A>
where
    S: DocumentStore,
    LLM: Send + Sync,
    V: Send + Sync,
    A: Send + Sync,
{
    #[instrument(skip(self), fields(uid = %identity))]
    async fn get_profile(&self, identity: Identity) -> Result<UserProfile, CoreError> {
        let record = self.document_store.get_record(&identity).await?;

        Ok(UserProfile {
            uid: identity.uid().to_string(),
            preferences: UserPreferences::resolve(&record.preferences),
            profile: record.profile,
        })
    }

    #[instrument(skip(self, profile), fields(uid = %identity))]
    async fn update_profile(&self, identity: Identity, profile: Document) -> Result<(), CoreError> {
        let mut merged = self.document_store.get_record(&identity).await?.profile;
        merged.extend(profile);

        let mut fields = Document::new();
        fields.insert(PROFILE_FIELD.to_string(), Value::Object(merged));

        self.document_store
            .set_fields(&identity, fields, WriteMode::Merge)
            .await?;

        Ok(())
    }
}
