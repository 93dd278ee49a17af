use std::future::Future;

use crate::domain::{
    authentication::value_objects::Identity, common::entities::app_errors::CoreError,
    profile::entities::UserProfile, storage::entities::Document,
};

#[cfg_attr(test, mockall::automock)]
pub trait ProfileService: Send + Sync {
    /// Profile object plus merged preferences.
    fn get_profile(
        &self,
        identity: Identity,
    ) -> impl Future<Output = Result<UserProfile, CoreError>> + Send;

    /// Shallow-merges `profile` into the stored profile object.
    fn update_profile(
        &self,
        identity: Identity,
        profile: Document,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}
