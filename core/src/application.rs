use std::time::Duration;

use reqwest::Client;

use crate::{
    domain::{
        common::{
            NutrisnapConfig,
            entities::app_errors::CoreError,
            services::{Service, ServiceSettings},
        },
        storage::services::FallbackDocumentStore,
    },
    infrastructure::{
        firestore::FirestoreDocumentStore,
        google_auth::{GoogleTokenSource, ServiceAccountKey},
        identity::FirebaseTokenVerifier,
        llm::{GeminiBackend, GeminiLLMClient},
        local_store::LocalFileStore,
        video::YoutubeVideoLookup,
    },
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub type NutrisnapStore = FallbackDocumentStore<FirestoreDocumentStore, LocalFileStore>;

pub type NutrisnapService =
    Service<NutrisnapStore, GeminiLLMClient, YoutubeVideoLookup, FirebaseTokenVerifier>;

/// Builds the production service. Missing or unreadable cloud settings are
/// reported as `CoreError::Configuration` so the caller can still boot in a
/// degraded state.
pub async fn create_service(config: NutrisnapConfig) -> Result<NutrisnapService, CoreError> {
    let client = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .map_err(|e| CoreError::Configuration(format!("http client: {e}")))?;

    let service_account = load_service_account(&config).await?;

    let project_id = config
        .gcp
        .project_id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .or_else(|| service_account.as_ref().and_then(|key| key.project_id.clone()))
        .ok_or_else(|| CoreError::Configuration("GCP_PROJECT_ID is not set".to_string()))?;

    let token_source = match service_account {
        Some(key) => GoogleTokenSource::service_account(key, client.clone()),
        None if config.storage.firestore_emulator_host.is_some() => GoogleTokenSource::Anonymous,
        None => {
            return Err(CoreError::Configuration(
                "set GOOGLE_APPLICATION_CREDENTIALS or GCP_SERVICE_ACCOUNT_JSON".to_string(),
            ));
        }
    };

    let gemini_backend = match config.llm.gemini_api_key.clone() {
        Some(api_key) if !api_key.trim().is_empty() => GeminiBackend::ApiKey(api_key),
        _ if matches!(token_source, GoogleTokenSource::Anonymous) => {
            return Err(CoreError::Configuration(
                "GEMINI_API_KEY is required without a service account".to_string(),
            ));
        }
        _ => GeminiBackend::Vertex {
            project_id: project_id.clone(),
            location: config.llm.location.clone(),
            token_source: token_source.clone(),
        },
    };

    let primary = FirestoreDocumentStore::new(
        client.clone(),
        token_source,
        &project_id,
        &config.storage.firestore_database,
        config.storage.firestore_emulator_host.as_deref(),
    );
    let fallback = LocalFileStore::new(config.storage.local_data_dir.clone());

    let llm_client = GeminiLLMClient::new(gemini_backend, config.llm.gemini_model.clone(), client.clone());
    let video_lookup = YoutubeVideoLookup::new(config.enrichment.youtube_api_key.clone(), client.clone());
    let identity_verifier = FirebaseTokenVerifier::new(project_id.clone(), client);

    tracing::info!(
        project_id = %project_id,
        model = %config.llm.gemini_model,
        local_data_dir = %config.storage.local_data_dir.display(),
        emulator = config.storage.firestore_emulator_host.is_some(),
        video_enrichment = video_lookup.is_enabled(),
        "NutriSnap service configured"
    );

    Ok(Service::new(
        FallbackDocumentStore::new(primary, fallback),
        llm_client,
        video_lookup,
        identity_verifier,
        ServiceSettings {
            llm_timeout: config.llm.timeout,
            feedback_aware_prompts: config.features.feedback_aware_prompts,
        },
    ))
}

/// Inline JSON wins over the credentials path.
async fn load_service_account(
    config: &NutrisnapConfig,
) -> Result<Option<ServiceAccountKey>, CoreError> {
    if let Some(raw) = config
        .gcp
        .service_account_json
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
    {
        return ServiceAccountKey::from_json(raw).map(Some).map_err(CoreError::from);
    }

    match &config.gcp.credentials_path {
        Some(path) => ServiceAccountKey::from_file(path)
            .await
            .map(Some)
            .map_err(CoreError::from),
        None => Ok(None),
    }
}
