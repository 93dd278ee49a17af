pub mod errors;
pub mod token_source;

pub use errors::GoogleAuthError;
pub use token_source::{GoogleTokenSource, ServiceAccountKey};

pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
