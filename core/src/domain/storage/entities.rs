use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::common::generate_uuid_v7;

/// A schemaless JSON object as persisted by either backend.
pub type Document = Map<String, Value>;

pub const PROFILE_FIELD: &str = "profile";
pub const PREFERENCES_FIELD: &str = "preferences";

/// Ordered per-user collections. Every item carries an `id` and the
/// collection's timestamp field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    SavedRecipes,
    FoodHistory,
    Feedback,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::SavedRecipes,
        Collection::FoodHistory,
        Collection::Feedback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::SavedRecipes => "saved_recipes",
            Collection::FoodHistory => "food_history",
            Collection::Feedback => "feedback",
        }
    }

    /// Server-assigned ordering field.
    pub fn timestamp_field(&self) -> &'static str {
        match self {
            Collection::SavedRecipes => "saved_at",
            Collection::FoodHistory => "analyzed_at",
            Collection::Feedback => "created_at",
        }
    }

    /// Maximum number of items kept or returned.
    pub fn retention_cap(&self) -> Option<usize> {
        match self {
            Collection::SavedRecipes => None,
            Collection::FoodHistory => Some(50),
            Collection::Feedback => Some(100),
        }
    }

    pub fn is_collection_key(key: &str) -> bool {
        Self::ALL.iter().any(|c| c.as_str() == key)
    }
}

/// Top-level fields of a user's document. Collections are read through
/// `DocumentStore::list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub profile: Document,
    pub preferences: Document,
    #[serde(flatten)]
    pub other: Document,
}

impl UserRecord {
    /// Builds a record from raw top-level fields. Fields of the wrong type
    /// reset to empty and collection keys are skipped.
    pub fn from_fields(fields: Document) -> Self {
        let mut record = UserRecord::default();

        for (key, value) in fields {
            match key.as_str() {
                PROFILE_FIELD => record.profile = into_object(value),
                PREFERENCES_FIELD => record.preferences = into_object(value),
                other if Collection::is_collection_key(other) => {}
                _ => {
                    record.other.insert(key, value);
                }
            }
        }

        record
    }
}

pub fn into_object(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}

/// Returns the item's `id` when it is a non-empty string, assigning a fresh
/// one otherwise.
pub fn ensure_item_id(item: &mut Document) -> String {
    if let Some(Value::String(id)) = item.get("id")
        && !id.trim().is_empty()
    {
        return id.clone();
    }

    let id = generate_uuid_v7().to_string();
    item.insert("id".to_string(), Value::String(id.clone()));
    id
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    PermissionDenied,
    Unavailable,
    Unauthenticated,
    NotFound,
    InvalidArgument,
    Conflict,
    Io,
    Corrupt,
    Internal,
}

impl StoreErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreErrorKind::PermissionDenied => "permission denied",
            StoreErrorKind::Unavailable => "unavailable",
            StoreErrorKind::Unauthenticated => "unauthenticated",
            StoreErrorKind::NotFound => "not found",
            StoreErrorKind::InvalidArgument => "invalid argument",
            StoreErrorKind::Conflict => "conflict",
            StoreErrorKind::Io => "io",
            StoreErrorKind::Corrupt => "corrupt",
            StoreErrorKind::Internal => "internal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {}", .kind.as_str(), .message)]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Unavailable, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::InvalidArgument, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Internal, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_from_fields_is_lenient() {
        let fields = into_object(json!({
            "profile": "not an object",
            "preferences": {"diet_type": "vegan"},
            "food_history": [],
            "display_name": "Ana"
        }));
        let record = UserRecord::from_fields(fields);

        assert!(record.profile.is_empty());
        assert_eq!(record.preferences.get("diet_type"), Some(&json!("vegan")));
        assert!(!record.other.contains_key("food_history"));
        assert_eq!(record.other.get("display_name"), Some(&json!("Ana")));
    }

    #[test]
    fn test_ensure_item_id_keeps_existing_id() {
        let mut item = into_object(json!({"id": "abc"}));
        assert_eq!(ensure_item_id(&mut item), "abc");

        let mut blank = into_object(json!({"id": ""}));
        let assigned = ensure_item_id(&mut blank);
        assert!(!assigned.is_empty());
        assert_eq!(blank.get("id"), Some(&json!(assigned)));
    }
}
