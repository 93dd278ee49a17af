use std::future::Future;

use crate::domain::{
    authentication::value_objects::Identity, common::entities::app_errors::CoreError,
};

/// Verifies a bearer token issued by the identity provider.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityVerifier: Send + Sync {
    fn verify(&self, token: String) -> impl Future<Output = Result<Identity, CoreError>> + Send;
}

#[cfg_attr(test, mockall::automock)]
pub trait AuthService: Send + Sync {
    /// Resolves a bearer token to an identity. Any failure is `InvalidToken`.
    fn authenticate(&self, token: String)
    -> impl Future<Output = Result<Identity, CoreError>> + Send;
}
