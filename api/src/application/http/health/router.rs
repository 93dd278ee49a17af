use super::handlers::get_health::{__path_get_health, get_health};
use crate::application::http::server::app_state::AppState;

use axum::{Router, routing::get};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(get_health))]
pub struct HealthApiDoc;

pub fn health_routes(state: AppState) -> Router<AppState> {
    Router::new().route(
        &format!("{}/api/test", state.args.server.root_path),
        get(get_health),
    )
}
