use super::handlers::analyze_food::{__path_analyze_food, analyze_food};
use super::validators::MAX_IMAGE_SIZE;
use crate::application::http::server::app_state::AppState;

use axum::{Router, extract::DefaultBodyLimit, routing::post};
use utoipa::OpenApi;

/// Room for the multipart envelope around the largest accepted image.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(paths(analyze_food))]
pub struct FoodAnalysisApiDoc;

pub fn food_analysis_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            &format!("{}/api/analyze-food", state.args.server.root_path),
            post(analyze_food),
        )
        .layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + MULTIPART_OVERHEAD))
}
