use thiserror::Error;

use crate::domain::{
    common::entities::app_errors::CoreError,
    storage::entities::{StoreError, StoreErrorKind},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoogleAuthError {
    #[error("invalid service account credentials: {0}")]
    InvalidCredentials(String),

    #[error("failed to sign token request: {0}")]
    Signing(String),

    #[error("token endpoint unreachable: {0}")]
    Transport(String),

    #[error("token endpoint rejected the credentials: {0}")]
    Rejected(String),
}

impl From<GoogleAuthError> for StoreError {
    fn from(error: GoogleAuthError) -> Self {
        let kind = match error {
            GoogleAuthError::Transport(_) => StoreErrorKind::Unavailable,
            GoogleAuthError::Rejected(_) => StoreErrorKind::PermissionDenied,
            GoogleAuthError::InvalidCredentials(_) | GoogleAuthError::Signing(_) => {
                StoreErrorKind::Unauthenticated
            }
        };
        StoreError::new(kind, error.to_string())
    }
}

impl From<GoogleAuthError> for CoreError {
    fn from(error: GoogleAuthError) -> Self {
        match error {
            GoogleAuthError::InvalidCredentials(message) => CoreError::Configuration(message),
            other => CoreError::UpstreamFailed(other.to_string()),
        }
    }
}
