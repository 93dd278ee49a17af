use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::storage::entities::Document;

/// Canonical preference keys and the value used when nothing is stored.
pub const DEFAULT_PREFERENCES: [(&str, &str); 7] = [
    ("health_goal", "balanced"),
    ("diet_type", "non-vegetarian"),
    ("allergies", "none"),
    ("cooking_time", "moderate"),
    ("cuisine_preferences", "any"),
    ("calorie_target", "not specified"),
    ("fitness_goal", "general health"),
];

/// Free-text preference mapping. Every canonical key is always present once
/// resolved; unknown keys written by clients are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UserPreferences(BTreeMap<String, String>);

impl Default for UserPreferences {
    fn default() -> Self {
        Self::defaults()
    }
}

impl UserPreferences {
    pub fn defaults() -> Self {
        Self(
            DEFAULT_PREFERENCES
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        )
    }

    /// Overlays every usable value of `stored` on top of `self`.
    pub fn merged_with(mut self, stored: &Document) -> Self {
        for (key, value) in stored {
            match coerce_preference_value(value) {
                Some(text) => {
                    self.0.insert(key.clone(), text);
                }
                None => {
                    tracing::warn!(key = %key, "ignoring unusable preference value");
                }
            }
        }

        self
    }

    /// Resolves a stored mapping against the defaults.
    pub fn resolve(stored: &Document) -> Self {
        Self::defaults().merged_with(stored)
    }

    /// Reads a mapping exactly as it was recorded, without filling defaults.
    pub fn from_snapshot(snapshot: &Document) -> Self {
        Self(BTreeMap::new()).merged_with(snapshot)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical keys in their fixed order, then any extra keys sorted by name.
    pub fn ordered_entries(&self) -> Vec<(&str, &str)> {
        let canonical = DEFAULT_PREFERENCES
            .iter()
            .filter_map(|(key, _)| self.get(key).map(|value| (*key, value)));

        let extra = self
            .0
            .iter()
            .filter(|(key, _)| !is_canonical_key(key))
            .map(|(key, value)| (key.as_str(), value.as_str()));

        canonical.chain(extra).collect()
    }

    pub fn to_document(&self) -> Document {
        self.0
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect()
    }
}

pub fn is_canonical_key(key: &str) -> bool {
    DEFAULT_PREFERENCES.iter().any(|(k, _)| *k == key)
}

/// Strings are kept, numbers and booleans become text, arrays of scalars are
/// joined. Null, blank strings and nested objects are unusable.
fn coerce_preference_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter(|item| !item.is_array() && !item.is_object())
                .filter_map(coerce_preference_value)
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Null | Value::Object(_) => None,
    }
}
