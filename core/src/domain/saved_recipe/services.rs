use tracing::instrument;

use crate::domain::{
    authentication::value_objects::Identity,
    common::{entities::app_errors::CoreError, services::Service},
    saved_recipe::{
        entities::{SavedRecipe, strip_server_fields},
        ports::SavedRecipeService,
    },
    storage::{
        entities::{Collection, Document},
        ports::DocumentStore,
    },
};

impl<S, LLM, V, A> SavedRecipeService for Service<S, LLM, V, A>
where
    S: DocumentStore,
    LLM: Send + Sync,
    V: Send + Sync,
    A: Send + Sync,
{
    #[instrument(skip(self), fields(uid = %identity))]
    async fn list_saved_recipes(&self, identity: Identity) -> Result<Vec<SavedRecipe>, CoreError> {
        let documents = self
            .document_store
            .list(&identity, Collection::SavedRecipes, None)
            .await?;

        Ok(documents
            .iter()
            .filter_map(SavedRecipe::from_document)
            .collect())
    }

    #[instrument(skip(self, recipe), fields(uid = %identity))]
    async fn save_recipe(&self, identity: Identity, recipe: Document) -> Result<String, CoreError> {
        let recipe = strip_server_fields(recipe);
        if recipe.is_empty() {
            return Err(CoreError::Invalid(
                "recipe must be a non-empty object".to_string(),
            ));
        }

        let id = self
            .document_store
            .append(&identity, Collection::SavedRecipes, recipe, None)
            .await?;

        tracing::info!(recipe_id = %id, "recipe saved");

        Ok(id)
    }

    #[instrument(skip(self), fields(uid = %identity))]
    async fn delete_saved_recipe(
        &self,
        identity: Identity,
        recipe_id: String,
    ) -> Result<(), CoreError> {
        if recipe_id.trim().is_empty() {
            return Err(CoreError::Invalid("recipe id is required".to_string()));
        }

        self.document_store
            .delete_item(&identity, Collection::SavedRecipes, &recipe_id)
            .await?;

        Ok(())
    }
}
