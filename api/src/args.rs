use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use nutrisnap_core::domain::common::{
    DEFAULT_LOCAL_DATA_DIR, EnrichmentConfig, FeatureConfig, GcpConfig, LLMConfig,
    NutrisnapConfig, StorageConfig,
};

#[derive(Debug, Clone, Parser)]
#[command(name = "nutrisnap", version, about = "NutriSnap backend")]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub gcp: GcpArgs,

    #[command(flatten)]
    pub llm: LlmArgs,

    #[command(flatten)]
    pub storage: StorageArgs,

    #[command(flatten)]
    pub enrichment: EnrichmentArgs,

    #[command(flatten)]
    pub features: FeatureArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ServerArgs {
    #[arg(long = "server-host", env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long = "server-port", env = "SERVER_PORT", default_value_t = 8000)]
    pub port: u16,

    #[arg(long = "root-path", env = "ROOT_PATH", default_value = "")]
    pub root_path: String,

    /// Empty or `*` allows any origin.
    #[arg(
        long = "frontend-origins",
        env = "FRONTEND_ORIGINS",
        value_delimiter = ',',
        default_value = ""
    )]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct GcpArgs {
    #[arg(long = "gcp-project-id", env = "GCP_PROJECT_ID")]
    pub project_id: Option<String>,

    #[arg(long = "google-application-credentials", env = "GOOGLE_APPLICATION_CREDENTIALS")]
    pub credentials_path: Option<PathBuf>,

    /// Inline key JSON. Takes precedence over the credentials path.
    #[arg(long = "gcp-service-account-json", env = "GCP_SERVICE_ACCOUNT_JSON", hide_env_values = true)]
    pub service_account_json: Option<String>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LlmArgs {
    #[arg(long = "gemini-model", env = "GEMINI_MODEL", default_value = "gemini-2.5-flash")]
    pub gemini_model: String,

    #[arg(long = "gcp-location", env = "GCP_LOCATION", default_value = "us-central1")]
    pub location: String,

    #[arg(long = "gemini-api-key", env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long = "llm-timeout-secs", env = "LLM_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, clap::Args)]
pub struct StorageArgs {
    #[arg(long = "local-data-dir", env = "LOCAL_DATA_DIR", default_value = DEFAULT_LOCAL_DATA_DIR)]
    pub local_data_dir: PathBuf,

    #[arg(long = "firestore-database", env = "FIRESTORE_DATABASE", default_value = "(default)")]
    pub firestore_database: String,

    #[arg(long = "firestore-emulator-host", env = "FIRESTORE_EMULATOR_HOST")]
    pub firestore_emulator_host: Option<String>,
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct EnrichmentArgs {
    #[arg(long = "youtube-api-key", env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub youtube_api_key: Option<String>,
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct FeatureArgs {
    #[arg(
        long = "feedback-aware-prompts",
        env = "FEEDBACK_AWARE_PROMPTS",
        default_value_t = false,
        action = clap::ArgAction::Set
    )]
    pub feedback_aware_prompts: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct LogArgs {
    #[arg(long = "log-json", env = "LOG_JSON", default_value_t = false, action = clap::ArgAction::Set)]
    pub json: bool,
}

impl LogArgs {
    pub fn format(&self) -> LogFormat {
        if self.json {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

impl ServerArgs {
    /// Configured origins, or `None` when any origin is allowed.
    pub fn explicit_origins(&self) -> Option<Vec<String>> {
        let origins: Vec<String> = self
            .allowed_origins
            .iter()
            .map(|origin| origin.trim().trim_end_matches('/').to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            None
        } else {
            Some(origins)
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<Args> for NutrisnapConfig {
    fn from(args: Args) -> Self {
        NutrisnapConfig {
            gcp: GcpConfig {
                project_id: non_blank(args.gcp.project_id),
                credentials_path: args
                    .gcp
                    .credentials_path
                    .filter(|path| !path.as_os_str().is_empty()),
                service_account_json: non_blank(args.gcp.service_account_json),
            },
            llm: LLMConfig {
                gemini_model: args.llm.gemini_model,
                location: args.llm.location,
                gemini_api_key: non_blank(args.llm.gemini_api_key),
                timeout: Duration::from_secs(args.llm.timeout_secs),
            },
            storage: StorageConfig {
                local_data_dir: args.storage.local_data_dir,
                firestore_database: args.storage.firestore_database,
                firestore_emulator_host: non_blank(args.storage.firestore_emulator_host),
            },
            enrichment: EnrichmentConfig {
                youtube_api_key: non_blank(args.enrichment.youtube_api_key),
            },
            features: FeatureConfig {
                feedback_aware_prompts: args.features.feedback_aware_prompts,
            },
        }
    }
}
