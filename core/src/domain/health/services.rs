use crate::domain::{
    common::services::Service,
    health::{entities::HealthStatus, ports::HealthCheckService},
};

impl<S, LLM, V, A> HealthCheckService for Service<S, LLM, V, A>
where
    S: Send + Sync,
    LLM: Send + Sync,
    V: Send + Sync,
    A: Send + Sync,
{
    fn health(&self) -> HealthStatus {
        HealthStatus::ok()
    }
}
