use std::sync::Arc;
use std::time::Duration;

/// Runtime switches shared by every service operation.
#[derive(Clone, Debug)]
pub struct ServiceSettings {
    pub llm_timeout: Duration,
    pub feedback_aware_prompts: bool,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            llm_timeout: Duration::from_secs(60),
            feedback_aware_prompts: false,
        }
    }
}

/// Implements every service trait of the domain. Built once at startup and
/// shared between requests.
pub struct Service<S, LLM, V, A> {
    pub(crate) document_store: Arc<S>,
    pub(crate) llm_client: Arc<LLM>,
    pub(crate) video_lookup: Arc<V>,
    pub(crate) identity_verifier: Arc<A>,
    pub(crate) settings: ServiceSettings,
}

impl<S, LLM, V, A> Service<S, LLM, V, A> {
    pub fn new(
        document_store: S,
        llm_client: LLM,
        video_lookup: V,
        identity_verifier: A,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            document_store: Arc::new(document_store),
            llm_client: Arc::new(llm_client),
            video_lookup: Arc::new(video_lookup),
            identity_verifier: Arc::new(identity_verifier),
            settings,
        }
    }
}

impl<S, LLM, V, A> Clone for Service<S, LLM, V, A> {
    fn clone(&self) -> Self {
        Self {
            document_store: Arc::clone(&self.document_store),
            llm_client: Arc::clone(&self.llm_client),
            video_lookup: Arc::clone(&self.video_lookup),
            identity_verifier: Arc::clone(&self.identity_verifier),
            settings: self.settings.clone(),
        }
    }
}
