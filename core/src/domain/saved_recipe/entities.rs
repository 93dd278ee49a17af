use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{common::serde_lenient, storage::entities::Document};

/// A recipe bookmarked by the user. The recipe body is kept as the client
/// sent it; only `id` and `saved_at` are owned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedRecipe {
    #[serde(default, deserialize_with = "serde_lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "serde_lenient::opt_datetime")]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub recipe: Document,
}

impl SavedRecipe {
    pub fn from_document(document: &Document) -> Option<Self> {
        serde_json::from_value(Value::Object(document.clone()))
            .map_err(|e| tracing::warn!(error = %e, "skipping unreadable saved recipe"))
            .ok()
            .filter(|recipe: &SavedRecipe| !recipe.id.is_empty())
    }

    pub fn name(&self) -> Option<&str> {
        self.recipe.get("name").and_then(Value::as_str)
    }
}

/// Drops the server-owned keys from a client body.
pub fn strip_server_fields(mut recipe: Document) -> Document {
    recipe.remove("id");
    recipe.remove("saved_at");
    recipe
}
