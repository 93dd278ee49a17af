use crate::domain::storage::entities::{StoreError, StoreErrorKind};

/// What the dispatcher does after the primary store failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackDecision {
    RetryOnFallback,
    Propagate,
}

/// Only infrastructure unavailability switches backends. Everything else is
/// a real failure of the request and reaches the caller unchanged.
pub fn fallback_decision(kind: StoreErrorKind) -> FallbackDecision {
    match kind {
        StoreErrorKind::PermissionDenied | StoreErrorKind::Unavailable => {
            FallbackDecision::RetryOnFallback
        }
        StoreErrorKind::Unauthenticated
        | StoreErrorKind::NotFound
        | StoreErrorKind::InvalidArgument
        | StoreErrorKind::Conflict
        | StoreErrorKind::Io
        | StoreErrorKind::Corrupt
        | StoreErrorKind::Internal => FallbackDecision::Propagate,
    }
}

pub fn is_infrastructure_unavailable(error: &StoreError) -> bool {
    fallback_decision(error.kind) == FallbackDecision::RetryOnFallback
}
