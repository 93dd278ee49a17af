use crate::domain::health::entities::HealthStatus;

#[cfg_attr(test, mockall::automock)]
pub trait HealthCheckService: Send + Sync {
    fn health(&self) -> HealthStatus;
}
