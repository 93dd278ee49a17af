use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Ok,
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    pub status: HealthState,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: HealthState::Ok,
            message: "NutriSnap backend is running".to_string(),
            detail: None,
        }
    }

    /// Reported when the process started without a usable configuration.
    pub fn degraded(detail: impl Into<String>) -> Self {
        Self {
            status: HealthState::Degraded,
            message: "Backend booted with configuration errors".to_string(),
            detail: Some(detail.into()),
        }
    }
}
