use std::sync::Arc;

use nutrisnap_core::{
    application::NutrisnapService,
    domain::{
        common::entities::app_errors::CoreError,
        health::{entities::HealthStatus, ports::HealthCheckService},
    },
};

use crate::args::Args;

/// Outcome of startup wiring. A misconfigured backend still serves health
/// checks and answers every other call with the configuration error.
#[derive(Clone)]
pub enum Backend {
    Ready(NutrisnapService),
    Misconfigured(String),
}

#[derive(Clone)]
pub struct AppState {
    pub args: Arc<Args>,
    pub backend: Backend,
}

impl AppState {
    pub fn new(args: Arc<Args>, backend: Backend) -> Self {
        Self { args, backend }
    }

    pub fn service(&self) -> Result<&NutrisnapService, CoreError> {
        match &self.backend {
            Backend::Ready(service) => Ok(service),
            Backend::Misconfigured(detail) => Err(CoreError::Configuration(detail.clone())),
        }
    }

    pub fn health(&self) -> HealthStatus {
        match &self.backend {
            Backend::Ready(service) => service.health(),
            Backend::Misconfigured(detail) => HealthStatus::degraded(detail.clone()),
        }
    }
}
