use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::instrument;
use uuid::Uuid;

use crate::domain::{
    authentication::value_objects::Identity,
    common::serde_lenient::value_to_datetime,
    storage::{
        entities::{
            Collection, Document, PREFERENCES_FIELD, PROFILE_FIELD, StoreError, StoreErrorKind,
            UserRecord, ensure_item_id,
        },
        ports::DocumentStore,
        value_objects::WriteMode,
    },
};

/// Fallback backend: one pretty-printed JSON file per identity.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl LocalFileStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, identity: &Identity) -> Result<PathBuf, StoreError> {
        let safe = sanitize_uid(identity.uid());
        if safe.is_empty() {
            return Err(StoreError::invalid_argument(format!(
                "uid '{}' has no usable characters",
                identity.uid()
            )));
        }

        Ok(self.root.join(format!("{safe}.json")))
    }

    async fn load(&self, path: &Path) -> Result<Document, StoreError> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(empty_user_file()),
            Err(e) => {
                return Err(StoreError::new(
                    StoreErrorKind::Io,
                    format!("failed to read {}: {}", path.display(), e),
                ));
            }
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(document)) => Ok(normalize_user_file(document)),
            Ok(_) => {
                tracing::warn!(path = %path.display(), "local user file is not an object, resetting");
                Ok(empty_user_file())
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "local user file is corrupt, resetting");
                Ok(empty_user_file())
            }
        }
    }

    async fn save(&self, path: &Path, document: &Document) -> Result<(), StoreError> {
        let io_error = |e: std::io::Error| {
            StoreError::new(
                StoreErrorKind::Io,
                format!("failed to write {}: {}", path.display(), e),
            )
        };

        tokio::fs::create_dir_all(&self.root).await.map_err(io_error)?;

        let bytes = serde_json::to_vec_pretty(document)
            .map_err(|e| StoreError::internal(format!("failed to encode user file: {}", e)))?;

        let tmp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        tokio::fs::write(&tmp_path, bytes).await.map_err(io_error)?;

        if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(io_error(e));
        }

        Ok(())
    }
}

impl DocumentStore for LocalFileStore {
    #[instrument(skip(self), fields(uid = %identity))]
    async fn get_record(&self, identity: &Identity) -> Result<UserRecord, StoreError> {
        let path = self.path_for(identity)?;
        let document = self.load(&path).await?;

        Ok(UserRecord::from_fields(document))
    }

    #[instrument(skip(self, fields), fields(uid = %identity))]
    async fn set_fields(
        &self,
        identity: &Identity,
        fields: Document,
        mode: WriteMode,
    ) -> Result<(), StoreError> {
        let path = self.path_for(identity)?;
        let _guard = self.write_lock.lock().await;
        let mut document = self.load(&path).await?;

        if mode == WriteMode::Overwrite {
            document.retain(|key, _| Collection::is_collection_key(key));
        }

        for (key, value) in fields {
            if Collection::is_collection_key(&key) {
                tracing::warn!(key = %key, "refusing to overwrite a collection through set_fields");
                continue;
            }
            document.insert(key, value);
        }

        self.save(&path, &normalize_user_file(document)).await
    }

    #[instrument(skip(self, item), fields(uid = %identity, collection = collection.as_str()))]
    async fn append(
        &self,
        identity: &Identity,
        collection: Collection,
        mut item: Document,
        cap: Option<usize>,
    ) -> Result<String, StoreError> {
        let path = self.path_for(identity)?;
        let item_id = ensure_item_id(&mut item);
        item.insert(
            collection.timestamp_field().to_string(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
        );

        let _guard = self.write_lock.lock().await;
        let mut document = self.load(&path).await?;
        let mut items = take_items(&mut document, collection);

        items.insert(0, item);
        if let Some(cap) = cap {
            items.truncate(cap);
        }

        put_items(&mut document, collection, items);
        self.save(&path, &document).await?;

        Ok(item_id)
    }

    #[instrument(skip(self), fields(uid = %identity, collection = collection.as_str()))]
    async fn delete_item(
        &self,
        identity: &Identity,
        collection: Collection,
        item_id: &str,
    ) -> Result<(), StoreError> {
        let path = self.path_for(identity)?;
        let _guard = self.write_lock.lock().await;
        let mut document = self.load(&path).await?;
        let mut items = take_items(&mut document, collection);

        let before = items.len();
        items.retain(|item| item.get("id").and_then(Value::as_str) != Some(item_id));
        if items.len() == before {
            return Ok(());
        }

        put_items(&mut document, collection, items);
        self.save(&path, &document).await
    }

    #[instrument(skip(self), fields(uid = %identity, collection = collection.as_str()))]
    async fn list(
        &self,
        identity: &Identity,
        collection: Collection,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError> {
        let path = self.path_for(identity)?;
        let mut document = self.load(&path).await?;
        let mut items = take_items(&mut document, collection);

        let field = collection.timestamp_field();
        items.sort_by(|a, b| {
            let a = a.get(field).and_then(value_to_datetime);
            let b = b.get(field).and_then(value_to_datetime);
            b.cmp(&a)
        });

        if let Some(limit) = limit {
            items.truncate(limit);
        }

        Ok(items)
    }
}

pub fn sanitize_uid(uid: &str) -> String {
    uid.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

fn empty_user_file() -> Document {
    normalize_user_file(Document::new())
}

/// Coerces each known field to its expected type. Unknown top-level fields
/// are kept as they are.
fn normalize_user_file(mut document: Document) -> Document {
    for field in [PROFILE_FIELD, PREFERENCES_FIELD] {
        if !document.get(field).is_some_and(Value::is_object) {
            document.insert(field.to_string(), Value::Object(Document::new()));
        }
    }

    for collection in Collection::ALL {
        let items = take_items(&mut document, collection);
        put_items(&mut document, collection, items);
    }

    document
}

fn take_items(document: &mut Document, collection: Collection) -> Vec<Document> {
    match document.remove(collection.as_str()) {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn put_items(document: &mut Document, collection: Collection, items: Vec<Document>) {
    document.insert(
        collection.as_str().to_string(),
        Value::Array(items.into_iter().map(Value::Object).collect()),
    );
}
