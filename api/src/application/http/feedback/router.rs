use super::handlers::{
    list_feedback::{__path_list_feedback, list_feedback},
    submit_feedback::{__path_submit_feedback, submit_feedback},
};
use crate::application::http::server::app_state::AppState;

use axum::{Router, routing::get};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(list_feedback, submit_feedback))]
pub struct FeedbackApiDoc;

pub fn feedback_routes(state: AppState) -> Router<AppState> {
    Router::new().route(
        &format!("{}/api/feedback", state.args.server.root_path),
        get(list_feedback).post(submit_feedback),
    )
}
