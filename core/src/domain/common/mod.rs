use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::{NoContext, Timestamp, Uuid};

pub mod entities;
pub mod serde_lenient;
pub mod services;

pub const DEFAULT_LOCAL_DATA_DIR: &str = "/tmp/nutrisnap_local_data";

#[derive(Clone, Debug)]
pub struct NutrisnapConfig {
    pub gcp: GcpConfig,
    pub llm: LLMConfig,
    pub storage: StorageConfig,
    pub enrichment: EnrichmentConfig,
    pub features: FeatureConfig,
}

#[derive(Clone, Debug, Default)]
pub struct GcpConfig {
    pub project_id: Option<String>,
    pub credentials_path: Option<PathBuf>,
    pub service_account_json: Option<String>,
}

#[derive(Clone, Debug)]
pub struct LLMConfig {
    pub gemini_model: String,
    pub location: String,
    /// When set, requests go to the Generative Language API instead of Vertex AI.
    pub gemini_api_key: Option<String>,
    pub timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub local_data_dir: PathBuf,
    pub firestore_database: String,
    pub firestore_emulator_host: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct EnrichmentConfig {
    pub youtube_api_key: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct FeatureConfig {
    pub feedback_aware_prompts: bool,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            gemini_model: "gemini-2.5-flash".to_string(),
            location: "us-central1".to_string(),
            gemini_api_key: None,
            timeout: Duration::from_secs(60),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            local_data_dir: PathBuf::from(DEFAULT_LOCAL_DATA_DIR),
            firestore_database: "(default)".to_string(),
            firestore_emulator_host: None,
        }
    }
}

pub fn generate_timestamp() -> (DateTime<Utc>, Timestamp) {
    let now = Utc::now();
    let seconds = now.timestamp().try_into().unwrap_or(0);
    let timestamp = Timestamp::from_unix(NoContext, seconds, now.timestamp_subsec_nanos());

    (now, timestamp)
}

pub fn generate_uuid_v7() -> Uuid {
    let (_, timestamp) = generate_timestamp();
    Uuid::new_v7(timestamp)
}
