use std::sync::Arc;

use crate::application::http::feedback::router::feedback_routes;
use crate::application::http::food_analysis::router::food_analysis_routes;
use crate::application::http::food_history::router::food_history_routes;
use crate::application::http::health::router::health_routes;
use crate::application::http::preferences::router::preferences_routes;
use crate::application::http::profile::router::profile_routes;
use crate::application::http::saved_recipe::router::saved_recipe_routes;
use crate::application::http::server::app_state::{AppState, Backend};
use crate::application::http::server::openapi::ApiDoc;
use crate::args::Args;

use axum::Router;
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use nutrisnap_core::{
    application::create_service,
    domain::common::{NutrisnapConfig, entities::app_errors::CoreError},
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, info, info_span, warn};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

/// Wires the backend. A configuration failure does not abort startup: the
/// state is marked misconfigured and the health route reports it.
pub async fn state(args: Arc<Args>) -> AppState {
    let config = NutrisnapConfig::from(args.as_ref().clone());

    let backend = match create_service(config).await {
        Ok(service) => {
            info!("NutriSnap backend configured");
            Backend::Ready(service)
        }
        Err(e) => {
            error!("Backend started without a usable configuration: {}", e);
            let detail = match e {
                CoreError::Configuration(detail) => detail,
                other => other.to_string(),
            };
            Backend::Misconfigured(detail)
        }
    };

    AppState::new(args, backend)
}

fn cors_layer(args: &Args) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::PUT,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, CONTENT_LENGTH, ACCEPT]);

    match args.server.explicit_origins() {
        Some(origins) => {
            let allowed_origins = origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid origin: {}", origin);
                        None
                    }
                })
                .collect::<Vec<HeaderValue>>();

            debug!("Allowed origins: {:?}", allowed_origins);

            cors.allow_origin(allowed_origins).allow_credentials(true)
        }
        None => {
            debug!("Allowing any origin");
            cors.allow_origin(Any)
        }
    }
}

///  Returns the [`Router`] of this application.
pub fn router(state: AppState) -> Result<Router, anyhow::Error> {
    let trace_layer = tower_http::trace::TraceLayer::new_for_http().make_span_with(
        |request: &axum::extract::Request| {
            let uri: String = request.uri().to_string();
            info_span!("http_request", method = ?request.method(), uri)
        },
    );

    let cors = cors_layer(&state.args);

    let mut openapi = ApiDoc::openapi();
    let mut paths = openapi.paths.clone();
    paths.paths = openapi
        .paths
        .paths
        .into_iter()
        .map(|(path, item)| (format!("{}{path}", state.args.server.root_path), item))
        .collect();
    openapi.paths = paths;

    let root_path = state.args.server.root_path.clone();
    let api_docs_url = format!("{}/api-docs/openapi.json", root_path);

    let router = axum::Router::new()
        .merge(Scalar::with_url(
            format!("{}/scalar", root_path),
            openapi.clone(),
        ))
        .merge(SwaggerUi::new(format!("{}/swagger-ui", root_path)).url(api_docs_url, openapi))
        .merge(health_routes(state.clone()))
        .merge(food_analysis_routes(state.clone()))
        .merge(preferences_routes(state.clone()))
        .merge(profile_routes(state.clone()))
        .merge(food_history_routes(state.clone()))
        .merge(saved_recipe_routes(state.clone()))
        .merge(feedback_routes(state.clone()))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state);
    Ok(router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::{
        TestServer,
        multipart::{MultipartForm, Part},
    };
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn misconfigured_server() -> TestServer {
        let args = Args::try_parse_from(["nutrisnap"]).expect("default args");
        let state = AppState::new(
            Arc::new(args),
            Backend::Misconfigured("GCP_PROJECT_ID is not set".to_string()),
        );
        TestServer::new(router(state).expect("router")).expect("test server")
    }

    #[tokio::test]
    async fn test_health_reports_degraded_backend() {
        let server = misconfigured_server();

        let response = server.get("/api/test").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["detail"], "GCP_PROJECT_ID is not set");
    }

    #[tokio::test]
    async fn test_guest_analysis_surfaces_configuration_error() {
        let server = misconfigured_server();
        let form = MultipartForm::new().add_part(
            "image",
            Part::bytes(vec![0xFF, 0xD8, 0xFF])
                .file_name("meal.jpg")
                .mime_type("image/jpeg"),
        );

        let response = server.post("/api/analyze-food").multipart(form).await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = response.json();
        assert_eq!(
            body["message"],
            "Backend configuration error: GCP_PROJECT_ID is not set"
        );
    }

    #[tokio::test]
    async fn test_protected_route_requires_token_before_backend() {
        let server = misconfigured_server();

        let response = server.get("/api/preferences").await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let body: Value = response.json();
        assert_eq!(body["message"], "Authentication required");
    }

    #[tokio::test]
    async fn test_openapi_document_lists_routes() {
        let server = misconfigured_server();

        let response = server.get("/api-docs/openapi.json").await;
        response.assert_status_ok();

        let body: Value = response.json();
        let paths = body["paths"].as_object().expect("paths");
        assert!(paths.contains_key("/api/analyze-food"));
        assert!(paths.contains_key("/api/saved-recipes/{recipe_id}"));
        assert!(paths.contains_key("/api/test"));
    }
}
