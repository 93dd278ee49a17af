use std::future::Future;

use crate::domain::{
    authentication::value_objects::Identity, common::entities::app_errors::CoreError,
    food_analysis::entities::RecipeAnalysis, food_history::entities::HistoryEntry,
    preferences::entities::UserPreferences,
};

#[cfg_attr(test, mockall::automock)]
pub trait FoodHistoryService: Send + Sync {
    /// Newest first, at most the collection's retention.
    fn get_food_history(
        &self,
        identity: Identity,
    ) -> impl Future<Output = Result<Vec<HistoryEntry>, CoreError>> + Send;

    /// Appends the outcome of an analysis with the preferences it used.
    fn record_analysis(
        &self,
        identity: Identity,
        analysis: RecipeAnalysis,
        preferences_used: UserPreferences,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}
