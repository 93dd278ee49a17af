//! Shared fakes for unit tests.

use std::sync::Mutex;
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;

use crate::{
    domain::{
        authentication::{ports::IdentityVerifier, value_objects::Identity},
        common::{entities::app_errors::CoreError, services::{Service, ServiceSettings}},
        food_analysis::{
            entities::RecipeAnalysis,
            ports::{LLMClient, VideoLookup},
            value_objects::{ImageInput, VideoMatch},
        },
        storage::{
            entities::{
                Collection, Document, StoreError, StoreErrorKind, UserRecord, ensure_item_id,
            },
            ports::DocumentStore,
            value_objects::WriteMode,
        },
    },
    infrastructure::local_store::LocalFileStore,
};

pub type TestService =
    Service<RecordingStore<LocalFileStore>, ScriptedLlm, ScriptedVideo, StaticVerifier>;

pub fn identity(uid: &str) -> Identity {
    Identity::new(uid).expect("non-blank uid")
}

/// Service over a fresh local store in a temporary directory.
pub fn test_service(verifier: StaticVerifier) -> (TestService, TempDir) {
    let dir = TempDir::new().expect("tempdir");
    let store = RecordingStore::new(LocalFileStore::new(dir.path().to_path_buf()));
    let service = Service::new(
        store,
        ScriptedLlm::replying(analysis_json(&["egg", "tomato"], &["Shakshuka"])),
        ScriptedVideo::default(),
        verifier,
        ServiceSettings::default(),
    );
    (service, dir)
}

pub fn service_with(
    llm: ScriptedLlm,
    video: ScriptedVideo,
    settings: ServiceSettings,
) -> (TestService, TempDir) {
    let dir = TempDir::new().expect("tempdir");
    let store = RecordingStore::new(LocalFileStore::new(dir.path().to_path_buf()));
    let service = Service::new(store, llm, video, StaticVerifier::rejecting(), settings);
    (service, dir)
}

/// Service whose every storage call fails with `kind`.
pub fn failing_store_service(
    kind: StoreErrorKind,
) -> Service<FailingStore, ScriptedLlm, ScriptedVideo, StaticVerifier> {
    Service::new(
        FailingStore::new(kind),
        ScriptedLlm::failing("unused"),
        ScriptedVideo::default(),
        StaticVerifier::rejecting(),
        ServiceSettings::default(),
    )
}

/// Analysis with two ingredients and one recipe per name.
pub fn sample_analysis(recipe_names: &[&str]) -> RecipeAnalysis {
    serde_json::from_str(&analysis_json(&["egg", "tomato"], recipe_names)).expect("analysis")
}

/// Model reply in the response contract. Each recipe asks for the video
/// query "<name> recipe".
pub fn analysis_json(ingredients: &[&str], recipe_names: &[&str]) -> String {
    let recipes: Vec<serde_json::Value> = recipe_names
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "description": format!("{name} from the fridge"),
                "servings": 2,
                "ingredients_used": ingredients,
                "additional_ingredients": ["salt"],
                "instructions": ["Prep", "Cook", "Serve"],
                "nutrition": {"calories_kcal": 420, "protein_g": 20, "carbs_g": 30, "fat_g": 12},
                "health_score": 8,
                "health_explanation": "Balanced",
                "diet_tags": [],
                "estimated_time_minutes": 25,
                "youtube_query": format!("{name} recipe")
            })
        })
        .collect();

    json!({
        "detected_ingredients": ingredients,
        "recipes": recipes,
        "ranking": recipe_names
    })
    .to_string()
}

/// Store whose every call fails. Records the ids it was asked to append.
#[derive(Debug, Default)]
pub struct FailingStore {
    kind: Option<StoreErrorKind>,
    appended_ids: Mutex<Vec<String>>,
}

impl FailingStore {
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind: Some(kind),
            appended_ids: Mutex::new(Vec::new()),
        }
    }

    pub fn appended_ids(&self) -> Vec<String> {
        self.appended_ids.lock().expect("lock").clone()
    }

    fn error(&self) -> StoreError {
        StoreError::new(
            self.kind.unwrap_or(StoreErrorKind::Internal),
            "scripted failure",
        )
    }
}

impl DocumentStore for FailingStore {
    async fn get_record(&self, _identity: &Identity) -> Result<UserRecord, StoreError> {
        Err(self.error())
    }

    async fn set_fields(
        &self,
        _identity: &Identity,
        _fields: Document,
        _mode: WriteMode,
    ) -> Result<(), StoreError> {
        Err(self.error())
    }

    async fn append(
        &self,
        _identity: &Identity,
        _collection: Collection,
        mut item: Document,
        _cap: Option<usize>,
    ) -> Result<String, StoreError> {
        let id = ensure_item_id(&mut item);
        self.appended_ids.lock().expect("lock").push(id);
        Err(self.error())
    }

    async fn delete_item(
        &self,
        _identity: &Identity,
        _collection: Collection,
        _item_id: &str,
    ) -> Result<(), StoreError> {
        Err(self.error())
    }

    async fn list(
        &self,
        _identity: &Identity,
        _collection: Collection,
        _limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError> {
        Err(self.error())
    }
}

/// Wraps a real store, counting appends and optionally failing them.
#[derive(Debug)]
pub struct RecordingStore<S> {
    inner: S,
    append_count: Mutex<usize>,
    append_failure: Mutex<Option<StoreErrorKind>>,
}

impl<S> RecordingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            append_count: Mutex::new(0),
            append_failure: Mutex::new(None),
        }
    }

    pub fn append_count(&self) -> usize {
        *self.append_count.lock().expect("lock")
    }

    pub fn fail_appends_with(&self, kind: StoreErrorKind) {
        *self.append_failure.lock().expect("lock") = Some(kind);
    }
}

impl<S: DocumentStore> DocumentStore for RecordingStore<S> {
    async fn get_record(&self, identity: &Identity) -> Result<UserRecord, StoreError> {
        self.inner.get_record(identity).await
    }

    async fn set_fields(
        &self,
        identity: &Identity,
        fields: Document,
        mode: WriteMode,
    ) -> Result<(), StoreError> {
        self.inner.set_fields(identity, fields, mode).await
    }

    async fn append(
        &self,
        identity: &Identity,
        collection: Collection,
        item: Document,
        cap: Option<usize>,
    ) -> Result<String, StoreError> {
        *self.append_count.lock().expect("lock") += 1;
        let failure = *self.append_failure.lock().expect("lock");
        if let Some(kind) = failure {
            return Err(StoreError::new(kind, "scripted append failure"));
        }
        self.inner.append(identity, collection, item, cap).await
    }

    async fn delete_item(
        &self,
        identity: &Identity,
        collection: Collection,
        item_id: &str,
    ) -> Result<(), StoreError> {
        self.inner.delete_item(identity, collection, item_id).await
    }

    async fn list(
        &self,
        identity: &Identity,
        collection: Collection,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError> {
        self.inner.list(identity, collection, limit).await
    }
}

/// Model fake returning a fixed reply, optionally after a delay.
#[derive(Debug)]
pub struct ScriptedLlm {
    reply: Result<String, CoreError>,
    delay: Option<Duration>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn replying(reply: String) -> Self {
        Self {
            reply: Ok(reply),
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(CoreError::UpstreamFailed(message.to_string())),
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().expect("lock").last().cloned()
    }
}

impl LLMClient for ScriptedLlm {
    async fn generate_with_image(
        &self,
        prompt: String,
        _image: ImageInput,
        _response_schema: serde_json::Value,
    ) -> Result<String, CoreError> {
        self.prompts.lock().expect("lock").push(prompt);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone()
    }
}

/// Video fake answering `video-<query>`, or failing for the listed queries.
#[derive(Debug, Default)]
pub struct ScriptedVideo {
    failing_queries: Vec<String>,
}

impl ScriptedVideo {
    pub fn failing_on(queries: &[&str]) -> Self {
        Self {
            failing_queries: queries.iter().map(|q| q.to_string()).collect(),
        }
    }
}

impl VideoLookup for ScriptedVideo {
    async fn search_video(&self, query: String) -> Result<Option<VideoMatch>, CoreError> {
        if self.failing_queries.contains(&query) {
            return Err(CoreError::UpstreamFailed("video search failed".to_string()));
        }

        Ok(Some(VideoMatch {
            thumbnail_url: Some(format!("https://img.example/{query}.jpg")),
            video_id: format!("video-{query}"),
        }))
    }
}

/// Accepts exactly one token.
#[derive(Debug, Default)]
pub struct StaticVerifier {
    accepted: Option<(String, String)>,
}

impl StaticVerifier {
    pub fn accepting(token: &str, uid: &str) -> Self {
        Self {
            accepted: Some((token.to_string(), uid.to_string())),
        }
    }

    pub fn rejecting() -> Self {
        Self { accepted: None }
    }
}

impl IdentityVerifier for StaticVerifier {
    async fn verify(&self, token: String) -> Result<Identity, CoreError> {
        match &self.accepted {
            Some((accepted, uid)) if *accepted == token => {
                Identity::new(uid.clone()).ok_or(CoreError::InvalidToken)
            }
            _ => Err(CoreError::InvalidToken),
        }
    }
}
