use std::future::Future;

use crate::domain::{
    authentication::value_objects::Identity, common::entities::app_errors::CoreError,
    preferences::entities::UserPreferences, storage::entities::Document,
};

#[cfg_attr(test, mockall::automock)]
pub trait PreferenceService: Send + Sync {
    /// Defaults for guests, defaults merged with the stored mapping otherwise.
    /// Never fails: storage errors fall back to the defaults.
    fn resolve_preferences(
        &self,
        identity: Option<Identity>,
    ) -> impl Future<Output = UserPreferences> + Send;

    /// Merges `incoming` over the currently stored preferences and persists
    /// the result.
    fn update_preferences(
        &self,
        identity: Identity,
        incoming: Document,
    ) -> impl Future<Output = Result<UserPreferences, CoreError>> + Send;
}
