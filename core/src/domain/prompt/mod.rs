pub mod policies;
pub mod services;
