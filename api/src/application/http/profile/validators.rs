use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateProfileValidator {
    /// Keys merged into the stored profile.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub profile: Map<String, Value>,
}
