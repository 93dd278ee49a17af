use super::handlers::get_food_history::{__path_get_food_history, get_food_history};
use crate::application::http::server::app_state::AppState;

use axum::{Router, routing::get};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(get_food_history))]
pub struct FoodHistoryApiDoc;

pub fn food_history_routes(state: AppState) -> Router<AppState> {
    Router::new().route(
        &format!("{}/api/food-history", state.args.server.root_path),
        get(get_food_history),
    )
}
