use std::{sync::LazyLock, time::Duration};

use regex::Regex;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::{Value, json};
use tracing::instrument;

use crate::{
    domain::{
        authentication::value_objects::Identity,
        storage::{
            entities::{Collection, Document, StoreError, UserRecord, ensure_item_id},
            ports::DocumentStore,
            value_objects::WriteMode,
        },
    },
    infrastructure::{
        firestore::{
            codec::{document_fields, document_id, to_firestore_fields},
            errors::{classify_response, classify_transport},
        },
        google_auth::GoogleTokenSource,
    },
};

const FIRESTORE_ENDPOINT: &str = "https://firestore.googleapis.com/v1";
const USERS_COLLECTION: &str = "users";
/// Bounds a stalled call so the fallback store can take over.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

static SIMPLE_FIELD_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("field path pattern is valid")
});

/// Primary store: Firestore REST v1. `users/{uid}` holds the top-level fields
/// and each collection is a sub-collection of it.
#[derive(Debug, Clone)]
pub struct FirestoreDocumentStore {
    client: Client,
    token_source: GoogleTokenSource,
    base_url: String,
    database_path: String,
    request_timeout: Duration,
}

impl FirestoreDocumentStore {
    pub fn new(
        client: Client,
        token_source: GoogleTokenSource,
        project_id: &str,
        database: &str,
        emulator_host: Option<&str>,
    ) -> Self {
        let base_url = match emulator_host {
            Some(host) => format!("http://{}/v1", host.trim_end_matches('/')),
            None => FIRESTORE_ENDPOINT.to_string(),
        };

        Self {
            client,
            token_source,
            base_url,
            database_path: format!("projects/{project_id}/databases/{database}/documents"),
            request_timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn user_path(&self, identity: &Identity) -> String {
        format!(
            "{}/{}/{}",
            self.database_path,
            USERS_COLLECTION,
            urlencoding::encode(identity.uid())
        )
    }

    fn item_path(&self, identity: &Identity, collection: Collection, item_id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.user_path(identity),
            collection.as_str(),
            urlencoding::encode(item_id)
        )
    }

    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, StoreError> {
        let url = format!("{}/{}", self.base_url, path);
        let mut builder = self
            .client
            .request(method, url)
            .timeout(self.request_timeout);

        if let Some(token) = self.token_source.access_token().await? {
            builder = builder.bearer_auth(token);
        }

        Ok(builder)
    }

    /// Sends the request, returning the body of a successful response.
    /// `Ok(None)` is a 404 when `allow_missing` is set.
    async fn send(
        &self,
        builder: RequestBuilder,
        allow_missing: bool,
    ) -> Result<Option<Value>, StoreError> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!("Firestore request failed: {}", e);
            classify_transport(&e)
        })?;

        let status = response.status();
        if allow_missing && status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = classify_response(status, &body);
            tracing::error!(status = %status, kind = error.kind.as_str(), "Firestore error: {}", error.message);
            return Err(error);
        }

        let body = response.json::<Value>().await.map_err(|e| {
            tracing::error!("Failed to decode Firestore response: {}", e);
            classify_transport(&e)
        })?;

        Ok(Some(body))
    }
}

/// Backtick-quotes a top-level field path unless it is a simple identifier.
pub fn quote_field_path(field: &str) -> String {
    if SIMPLE_FIELD_PATH.is_match(field) {
        return field.to_string();
    }

    let escaped = field.replace('\\', "\\\\").replace('`', "\\`");
    format!("`{escaped}`")
}

fn refuse_collection_keys(fields: &Document) -> Result<(), StoreError> {
    match fields.keys().find(|key| Collection::is_collection_key(key)) {
        Some(key) => Err(StoreError::invalid_argument(format!(
            "'{key}' is a collection and cannot be set as a field"
        ))),
        None => Ok(()),
    }
}

impl DocumentStore for FirestoreDocumentStore {
    #[instrument(skip(self), fields(uid = %identity))]
    async fn get_record(&self, identity: &Identity) -> Result<UserRecord, StoreError> {
        let builder = self.request(Method::GET, &self.user_path(identity)).await?;

        let record = match self.send(builder, true).await? {
            Some(resource) => UserRecord::from_fields(document_fields(&resource)),
            None => UserRecord::default(),
        };

        Ok(record)
    }

    #[instrument(skip(self, fields), fields(uid = %identity, mode = ?mode))]
    async fn set_fields(
        &self,
        identity: &Identity,
        fields: Document,
        mode: WriteMode,
    ) -> Result<(), StoreError> {
        refuse_collection_keys(&fields)?;

        let mut builder = self
            .request(Method::PATCH, &self.user_path(identity))
            .await?
            .json(&json!({ "fields": to_firestore_fields(&fields) }));

        if mode == WriteMode::Merge {
            let mask: Vec<(&str, String)> = fields
                .keys()
                .map(|key| ("updateMask.fieldPaths", quote_field_path(key)))
                .collect();
            builder = builder.query(&mask);
        }

        self.send(builder, false).await?;
        Ok(())
    }

    #[instrument(skip(self, item), fields(uid = %identity, collection = collection.as_str()))]
    async fn append(
        &self,
        identity: &Identity,
        collection: Collection,
        mut item: Document,
        _cap: Option<usize>,
    ) -> Result<String, StoreError> {
        let item_id = ensure_item_id(&mut item);
        item.remove("id");
        item.remove(collection.timestamp_field());

        let write = json!({
            "writes": [{
                "update": {
                    "name": self.item_path(identity, collection, &item_id),
                    "fields": to_firestore_fields(&item),
                },
                "updateTransforms": [{
                    "fieldPath": quote_field_path(collection.timestamp_field()),
                    "setToServerValue": "REQUEST_TIME",
                }],
            }]
        });

        let commit_path = format!("{}:commit", self.database_path);
        let builder = self.request(Method::POST, &commit_path).await?.json(&write);
        self.send(builder, false).await?;

        Ok(item_id)
    }

    #[instrument(skip(self), fields(uid = %identity, collection = collection.as_str()))]
    async fn delete_item(
        &self,
        identity: &Identity,
        collection: Collection,
        item_id: &str,
    ) -> Result<(), StoreError> {
        let builder = self
            .request(Method::DELETE, &self.item_path(identity, collection, item_id))
            .await?;
        self.send(builder, true).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(uid = %identity, collection = collection.as_str()))]
    async fn list(
        &self,
        identity: &Identity,
        collection: Collection,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError> {
        let mut query = json!({
            "from": [{ "collectionId": collection.as_str() }],
            "orderBy": [{
                "field": { "fieldPath": quote_field_path(collection.timestamp_field()) },
                "direction": "DESCENDING",
            }],
        });
        if let Some(limit) = limit {
            query["limit"] = json!(limit);
        }

        let query_path = format!("{}:runQuery", self.user_path(identity));
        let builder = self
            .request(Method::POST, &query_path)
            .await?
            .json(&json!({ "structuredQuery": query }));

        let results = self.send(builder, true).await?.unwrap_or(Value::Null);

        let items = results
            .as_array()
            .map(|rows| {
                rows.iter()
                    .filter_map(|row| row.get("document"))
                    .map(|resource| {
                        let mut item = document_fields(resource);
                        if let Some(id) = document_id(resource) {
                            item.insert("id".to_string(), Value::String(id));
                        }
                        item
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(items)
    }
}
