use std::future::Future;

use crate::domain::{
    authentication::value_objects::Identity,
    common::entities::app_errors::CoreError,
    food_analysis::{
        entities::RecipeAnalysis,
        value_objects::{AnalyzeFoodInput, ImageInput, VideoMatch},
    },
};

/// LLM Client trait for calling multimodal models
#[cfg_attr(test, mockall::automock)]
pub trait LLMClient: Send + Sync {
    /// Returns the raw text of the first candidate.
    fn generate_with_image(
        &self,
        prompt: String,
        image: ImageInput,
        response_schema: serde_json::Value,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// Finds a tutorial video for a recipe search query.
#[cfg_attr(test, mockall::automock)]
pub trait VideoLookup: Send + Sync {
    fn search_video(
        &self,
        query: String,
    ) -> impl Future<Output = Result<Option<VideoMatch>, CoreError>> + Send;
}

/// Service trait for food analysis business logic
#[cfg_attr(test, mockall::automock)]
pub trait FoodAnalysisService: Send + Sync {
    /// Runs the full analysis workflow. `None` is the guest path: default
    /// preferences and no history.
    fn analyze_food(
        &self,
        identity: Option<Identity>,
        input: AnalyzeFoodInput,
    ) -> impl Future<Output = Result<RecipeAnalysis, CoreError>> + Send;
}
