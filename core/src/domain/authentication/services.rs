use tracing::instrument;

use crate::domain::{
    authentication::{
        ports::{AuthService, IdentityVerifier},
        value_objects::Identity,
    },
    common::{entities::app_errors::CoreError, services::Service},
};

impl<S, LLM, V, A> AuthService for Service<S, LLM, V, A>
where
    S: Send + Sync,
    LLM: Send + Sync,
    V: Send + Sync,
    A: IdentityVerifier,
{
    #[instrument(skip(self, token))]
    async fn authenticate(&self, token: String) -> Result<Identity, CoreError> {
        if token.trim().is_empty() {
            return Err(CoreError::InvalidToken);
        }

        self.identity_verifier.verify(token).await.map_err(|e| {
            tracing::debug!(error = %e, "bearer token rejected");
            CoreError::InvalidToken
        })
    }
}
