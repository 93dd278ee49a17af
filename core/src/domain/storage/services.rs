use tracing::instrument;

use crate::domain::{
    authentication::value_objects::Identity,
    storage::{
        entities::{Collection, Document, StoreError, UserRecord, ensure_item_id},
        policies::{FallbackDecision, fallback_decision},
        ports::DocumentStore,
        value_objects::WriteMode,
    },
};

/// Sends every call to the primary store and, when the primary is
/// unavailable, repeats the same call on the fallback store.
#[derive(Debug, Clone)]
pub struct FallbackDocumentStore<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackDocumentStore<P, F>
where
    P: DocumentStore,
    F: DocumentStore,
{
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    fn route_failure(
        &self,
        operation: &'static str,
        identity: &Identity,
        error: StoreError,
    ) -> Result<(), StoreError> {
        match fallback_decision(error.kind) {
            FallbackDecision::RetryOnFallback => {
                tracing::warn!(
                    operation,
                    uid = %identity,
                    error = %error,
                    "primary store unavailable, using local fallback"
                );
                Ok(())
            }
            FallbackDecision::Propagate => Err(error),
        }
    }
}

impl<P, F> DocumentStore for FallbackDocumentStore<P, F>
where
    P: DocumentStore,
    F: DocumentStore,
{
    #[instrument(skip(self), fields(uid = %identity))]
    async fn get_record(&self, identity: &Identity) -> Result<UserRecord, StoreError> {
        match self.primary.get_record(identity).await {
            Ok(record) => Ok(record),
            Err(error) => {
                self.route_failure("get_record", identity, error)?;
                self.fallback.get_record(identity).await
            }
        }
    }

    #[instrument(skip(self, fields), fields(uid = %identity))]
    async fn set_fields(
        &self,
        identity: &Identity,
        fields: Document,
        mode: WriteMode,
    ) -> Result<(), StoreError> {
        match self.primary.set_fields(identity, fields.clone(), mode).await {
            Ok(()) => Ok(()),
            Err(error) => {
                self.route_failure("set_fields", identity, error)?;
                self.fallback.set_fields(identity, fields, mode).await
            }
        }
    }

    #[instrument(skip(self, item), fields(uid = %identity, collection = collection.as_str()))]
    async fn append(
        &self,
        identity: &Identity,
        collection: Collection,
        mut item: Document,
        cap: Option<usize>,
    ) -> Result<String, StoreError> {
        // A retry on the fallback must write the same id.
        let item_id = ensure_item_id(&mut item);

        match self
            .primary
            .append(identity, collection, item.clone(), cap)
            .await
        {
            Ok(id) => Ok(id),
            Err(error) => {
                self.route_failure("append", identity, error)?;
                self.fallback.append(identity, collection, item, cap).await?;
                Ok(item_id)
            }
        }
    }

    #[instrument(skip(self), fields(uid = %identity, collection = collection.as_str()))]
    async fn delete_item(
        &self,
        identity: &Identity,
        collection: Collection,
        item_id: &str,
    ) -> Result<(), StoreError> {
        match self.primary.delete_item(identity, collection, item_id).await {
            Ok(()) => Ok(()),
            Err(error) => {
                self.route_failure("delete_item", identity, error)?;
                self.fallback.delete_item(identity, collection, item_id).await
            }
        }
    }

    #[instrument(skip(self), fields(uid = %identity, collection = collection.as_str()))]
    async fn list(
        &self,
        identity: &Identity,
        collection: Collection,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError> {
        match self.primary.list(identity, collection, limit).await {
            Ok(items) => Ok(items),
            Err(error) => {
                self.route_failure("list", identity, error)?;
                self.fallback.list(identity, collection, limit).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::storage::entities::{StoreErrorKind, into_object},
        infrastructure::local_store::LocalFileStore,
        testing::{FailingStore, identity},
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn fallback_over(kind: StoreErrorKind) -> (FallbackDocumentStore<FailingStore, LocalFileStore>, TempDir) {
        let dir = TempDir::new().expect("tempdir");
        let store = FallbackDocumentStore::new(
            FailingStore::new(kind),
            LocalFileStore::new(dir.path().to_path_buf()),
        );
        (store, dir)
    }

    #[tokio::test]
    async fn test_unavailable_primary_is_transparent() {
        let (store, _dir) = fallback_over(StoreErrorKind::Unavailable);
        let user = identity("user-1");

        store
            .set_fields(
                &user,
                into_object(json!({"preferences": {"diet_type": "vegan"}})),
                WriteMode::Merge,
            )
            .await
            .expect("set_fields");
        let record = store.get_record(&user).await.expect("get_record");
        assert_eq!(record.preferences.get("diet_type"), Some(&json!("vegan")));

        let id = store
            .append(
                &user,
                Collection::Feedback,
                into_object(json!({"recipe_name": "Soup", "feedback_type": "liked"})),
                Some(100),
            )
            .await
            .expect("append");
        let items = store
            .list(&user, Collection::Feedback, None)
            .await
            .expect("list");

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].get("id"), Some(&json!(id)));
    }

    #[tokio::test]
    async fn test_permission_denied_primary_falls_back() {
        let (store, _dir) = fallback_over(StoreErrorKind::PermissionDenied);
        let user = identity("user-1");

        let items = store.list(&user, Collection::SavedRecipes, None).await;
        assert_eq!(items, Ok(vec![]));
    }

    #[tokio::test]
    async fn test_not_found_propagates_without_touching_fallback() {
        let (store, dir) = fallback_over(StoreErrorKind::NotFound);
        let user = identity("user-1");

        let result = store
            .append(&user, Collection::SavedRecipes, into_object(json!({"name": "Pie"})), None)
            .await;

        assert_eq!(result.map_err(|e| e.kind), Err(StoreErrorKind::NotFound));
        assert!(!dir.path().join("user-1.json").exists());
    }

    #[tokio::test]
    async fn test_append_retry_keeps_the_assigned_id() {
        let (store, _dir) = fallback_over(StoreErrorKind::Unavailable);
        let user = identity("user-1");

        let id = store
            .append(&user, Collection::SavedRecipes, into_object(json!({"name": "Pie"})), None)
            .await
            .expect("append");
        let primary_attempts = store.primary.appended_ids();

        assert_eq!(primary_attempts, vec![id]);
    }
}
