use std::sync::Arc;

use clap::Parser;
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

use crate::application::http::server::http_server::{router, state};
use crate::args::{Args, LogArgs, LogFormat};

mod application;
mod args;

const DEFAULT_LOG_FILTER: &str = "info,nutrisnap_api=debug,nutrisnap_core=debug,tower_http=info";

fn init_logger(log: &LogArgs) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match log.format() {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv().ok();

    let args = Arc::new(Args::parse());
    init_logger(&args.log);

    let addr = format!("{}:{}", args.server.host, args.server.port);

    let app_state = state(args).await;
    let app = router(app_state)?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("NutriSnap API listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
