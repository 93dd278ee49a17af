use reqwest::StatusCode;
use serde::Deserialize;

use crate::domain::storage::entities::{StoreError, StoreErrorKind};

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Kind for a canonical google error status such as `PERMISSION_DENIED`.
pub fn kind_from_status_name(status: &str) -> Option<StoreErrorKind> {
    let kind = match status {
        "PERMISSION_DENIED" => StoreErrorKind::PermissionDenied,
        "UNAVAILABLE" | "DEADLINE_EXCEEDED" => StoreErrorKind::Unavailable,
        "UNAUTHENTICATED" => StoreErrorKind::Unauthenticated,
        "NOT_FOUND" => StoreErrorKind::NotFound,
        "INVALID_ARGUMENT" | "FAILED_PRECONDITION" | "OUT_OF_RANGE" => {
            StoreErrorKind::InvalidArgument
        }
        "ALREADY_EXISTS" | "ABORTED" => StoreErrorKind::Conflict,
        "INTERNAL" | "UNKNOWN" | "DATA_LOSS" | "RESOURCE_EXHAUSTED" | "CANCELLED"
        | "UNIMPLEMENTED" => StoreErrorKind::Internal,
        _ => return None,
    };
    Some(kind)
}

pub fn kind_from_http_status(status: StatusCode) -> StoreErrorKind {
    match status {
        StatusCode::FORBIDDEN => StoreErrorKind::PermissionDenied,
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            StoreErrorKind::Unavailable
        }
        StatusCode::UNAUTHORIZED => StoreErrorKind::Unauthenticated,
        StatusCode::NOT_FOUND => StoreErrorKind::NotFound,
        StatusCode::BAD_REQUEST => StoreErrorKind::InvalidArgument,
        StatusCode::CONFLICT => StoreErrorKind::Conflict,
        _ => StoreErrorKind::Internal,
    }
}

/// Classifies an unsuccessful Firestore response. The google `status` in the
/// body wins over the HTTP status.
pub fn classify_response(status: StatusCode, body: &str) -> StoreError {
    let parsed = serde_json::from_str::<GoogleErrorBody>(body).ok();

    let kind = parsed
        .as_ref()
        .and_then(|b| b.error.status.as_deref())
        .and_then(kind_from_status_name)
        .unwrap_or_else(|| kind_from_http_status(status));

    let message = parsed
        .map(|b| b.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("firestore returned {status}"));

    StoreError::new(kind, message)
}

/// Connection and timeout failures mean the store is unreachable.
pub fn classify_transport(error: &reqwest::Error) -> StoreError {
    if error.is_connect() || error.is_timeout() || error.is_request() {
        StoreError::unavailable(error.to_string())
    } else if error.is_decode() {
        StoreError::new(StoreErrorKind::Corrupt, error.to_string())
    } else {
        StoreError::unavailable(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_status_wins_over_http_status() {
        let body = r#"{"error": {"code": 400, "message": "denied", "status": "PERMISSION_DENIED"}}"#;
        let error = classify_response(StatusCode::BAD_REQUEST, body);

        assert_eq!(error.kind, StoreErrorKind::PermissionDenied);
        assert_eq!(error.message, "denied");
    }

    #[test]
    fn test_http_status_is_used_without_a_body() {
        assert_eq!(
            classify_response(StatusCode::SERVICE_UNAVAILABLE, "").kind,
            StoreErrorKind::Unavailable
        );
        assert_eq!(
            classify_response(StatusCode::NOT_FOUND, "<html>").kind,
            StoreErrorKind::NotFound
        );
        assert_eq!(
            classify_response(StatusCode::IM_A_TEAPOT, "").kind,
            StoreErrorKind::Internal
        );
    }

    #[test]
    fn test_deadline_exceeded_is_unavailable() {
        let body = r#"{"error": {"code": 504, "message": "slow", "status": "DEADLINE_EXCEEDED"}}"#;
        assert_eq!(
            classify_response(StatusCode::GATEWAY_TIMEOUT, body).kind,
            StoreErrorKind::Unavailable
        );
    }
}
