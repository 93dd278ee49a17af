use axum::extract::State;
use nutrisnap_core::domain::health::entities::HealthStatus;

use crate::application::http::server::{api_entities::response::Response, app_state::AppState};

#[utoipa::path(
    get,
    path = "/test",
    tag = "health",
    summary = "Backend status",
    description = "Reports whether the backend booted with a usable configuration.",
    responses(
        (status = 200, body = HealthStatus)
    ),
)]
pub async fn get_health(State(state): State<AppState>) -> Response<HealthStatus> {
    Response::OK(state.health())
}
