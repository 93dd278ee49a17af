use std::future::Future;

use crate::domain::{
    authentication::value_objects::Identity,
    storage::{
        entities::{Collection, Document, StoreError, UserRecord},
        value_objects::WriteMode,
    },
};

/// Per-identity document persistence. Implemented by the networked primary,
/// the on-disk fallback and the dispatcher combining both.
pub trait DocumentStore: Send + Sync {
    /// Top-level fields. An absent record is the default record.
    fn get_record(
        &self,
        identity: &Identity,
    ) -> impl Future<Output = Result<UserRecord, StoreError>> + Send;

    fn set_fields(
        &self,
        identity: &Identity,
        fields: Document,
        mode: WriteMode,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Appends `item`, stamping the collection's timestamp field, and returns
    /// its id. `cap` bounds the number of retained items when the backend
    /// enforces retention at write time.
    fn append(
        &self,
        identity: &Identity,
        collection: Collection,
        item: Document,
        cap: Option<usize>,
    ) -> impl Future<Output = Result<String, StoreError>> + Send;

    /// Deleting an absent id is not an error.
    fn delete_item(
        &self,
        identity: &Identity,
        collection: Collection,
        item_id: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Items newest first, each carrying its `id`.
    fn list(
        &self,
        identity: &Identity,
        collection: Collection,
        limit: Option<usize>,
    ) -> impl Future<Output = Result<Vec<Document>, StoreError>> + Send;
}
