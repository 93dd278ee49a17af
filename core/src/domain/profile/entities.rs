use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{preferences::entities::UserPreferences, storage::entities::Document};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub uid: String,
    #[schema(value_type = Object)]
    pub profile: Document,
    pub preferences: UserPreferences,
}
