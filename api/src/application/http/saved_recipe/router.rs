use super::handlers::{
    delete_saved_recipe::{__path_delete_saved_recipe, delete_saved_recipe},
    list_saved_recipes::{__path_list_saved_recipes, list_saved_recipes},
    save_recipe::{__path_save_recipe, save_recipe},
};
use crate::application::http::server::app_state::AppState;

use axum::{
    Router,
    routing::{delete, get},
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(list_saved_recipes, save_recipe, delete_saved_recipe))]
pub struct SavedRecipeApiDoc;

pub fn saved_recipe_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            &format!("{}/api/saved-recipes", state.args.server.root_path),
            get(list_saved_recipes).post(save_recipe),
        )
        .route(
            &format!(
                "{}/api/saved-recipes/{{recipe_id}}",
                state.args.server.root_path
            ),
            delete(delete_saved_recipe),
        )
}
