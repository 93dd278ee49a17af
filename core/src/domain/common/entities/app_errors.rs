use thiserror::Error;

use crate::domain::storage::entities::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid token")]
    InvalidToken,

    #[error("{0}")]
    ValidationFailed(String),

    #[error("Upstream model error: {0}")]
    UpstreamFailed(String),

    #[error("Storage error: {0}")]
    StorageFatal(String),

    #[error("Backend configuration error: {0}")]
    Configuration(String),

    #[error("Invalid request: {0}")]
    Invalid(String),

    #[error("Not found")]
    NotFound,

    #[error("Internal server error")]
    InternalServerError,
}

impl From<StoreError> for CoreError {
    fn from(error: StoreError) -> Self {
        CoreError::StorageFatal(error.to_string())
    }
}
