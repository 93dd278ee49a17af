use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{
    common::serde_lenient,
    preferences::entities::UserPreferences,
    storage::entities::{Document, into_object},
};

/// One completed analysis. `preferences_used` is the snapshot taken when
/// the analysis ran and is never re-merged with current defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HistoryEntry {
    #[serde(default, deserialize_with = "serde_lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "serde_lenient::text_list")]
    pub detected_ingredients: Vec<String>,
    #[serde(default, deserialize_with = "serde_lenient::text_list")]
    pub recipes_generated: Vec<String>,
    #[serde(default, deserialize_with = "serde_lenient::opt_datetime")]
    pub analyzed_at: Option<DateTime<Utc>>,
    #[serde(default = "empty_snapshot", deserialize_with = "preferences_snapshot")]
    pub preferences_used: UserPreferences,
}

impl HistoryEntry {
    pub fn from_document(document: &Document) -> Option<Self> {
        serde_json::from_value(Value::Object(document.clone()))
            .map_err(|e| tracing::warn!(error = %e, "skipping unreadable history entry"))
            .ok()
    }
}

/// Builds the stored form of a new history entry.
pub fn history_document(
    detected_ingredients: &[String],
    recipes_generated: Vec<String>,
    preferences_used: &UserPreferences,
) -> Document {
    let mut document = Document::new();
    document.insert(
        "detected_ingredients".to_string(),
        Value::from(detected_ingredients.to_vec()),
    );
    document.insert(
        "recipes_generated".to_string(),
        Value::from(recipes_generated),
    );
    document.insert(
        "preferences_used".to_string(),
        Value::Object(preferences_used.to_document()),
    );
    document
}

fn empty_snapshot() -> UserPreferences {
    UserPreferences::from_snapshot(&Document::new())
}

fn preferences_snapshot<'de, D>(deserializer: D) -> Result<UserPreferences, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(UserPreferences::from_snapshot(&into_object(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_is_not_filled_with_defaults() {
        let document = into_object(json!({
            "id": "h1",
            "detected_ingredients": ["egg", "tomato"],
            "recipes_generated": ["Shakshuka"],
            "analyzed_at": "2025-05-01T08:00:00Z",
            "preferences_used": {"diet_type": "vegan"}
        }));

        let entry = HistoryEntry::from_document(&document).expect("entry");

        assert_eq!(entry.preferences_used.get("diet_type"), Some("vegan"));
        assert_eq!(entry.preferences_used.get("health_goal"), None);
        assert_eq!(entry.recipes_generated, vec!["Shakshuka".to_string()]);
    }
}
