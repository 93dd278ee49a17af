use std::future::Future;

use crate::domain::{
    authentication::value_objects::Identity, common::entities::app_errors::CoreError,
    saved_recipe::entities::SavedRecipe, storage::entities::Document,
};

#[cfg_attr(test, mockall::automock)]
pub trait SavedRecipeService: Send + Sync {
    /// Newest first.
    fn list_saved_recipes(
        &self,
        identity: Identity,
    ) -> impl Future<Output = Result<Vec<SavedRecipe>, CoreError>> + Send;

    /// Stores the recipe under a server-assigned id and returns that id.
    fn save_recipe(
        &self,
        identity: Identity,
        recipe: Document,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;

    fn delete_saved_recipe(
        &self,
        identity: Identity,
        recipe_id: String,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}
