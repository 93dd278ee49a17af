use futures::future::join_all;
use tracing::instrument;

use crate::domain::{
    authentication::value_objects::Identity,
    common::{entities::app_errors::CoreError, services::Service},
    feedback::{entities::FeedbackEntry, ports::FeedbackService},
    food_analysis::{
        entities::{RecipeAnalysis, RecipeSuggestion},
        helpers::parse_model_response,
        policies::dietary_violations,
        ports::{FoodAnalysisService, LLMClient, VideoLookup},
        schema::get_recipe_analysis_schema,
        value_objects::{AnalyzeFoodInput, EnrichmentReport, VideoMatch},
    },
    food_history::ports::FoodHistoryService,
    preferences::{entities::UserPreferences, ports::PreferenceService},
    prompt::services::build_prompt,
    storage::ports::DocumentStore,
};

pub const MIN_DETECTED_INGREDIENTS: usize = 2;
pub const FEEDBACK_PROMPT_LIMIT: usize = 10;

pub const NOT_ENOUGH_INGREDIENTS: &str =
    "Not enough ingredients detected. Please try a clearer picture with more visible food items.";

impl<S, LLM, V, A> FoodAnalysisService for Service<S, LLM, V, A>
where
    S: DocumentStore,
    LLM: LLMClient,
    V: VideoLookup,
    A: Send + Sync,
{
    #[instrument(skip(self, input), fields(uid = %identity.as_ref().map(Identity::uid).unwrap_or("guest")))]
    async fn analyze_food(
        &self,
        identity: Option<Identity>,
        input: AnalyzeFoodInput,
    ) -> Result<RecipeAnalysis, CoreError> {
        // 1. Resolve preferences (guest path gets defaults)
        let preferences = self.resolve_preferences(identity.clone()).await;

        // 2. Optional feedback context
        let recent_feedback = self.recent_feedback(identity.as_ref()).await;

        // 3. Build prompt
        let prompt = build_prompt(&preferences, &recent_feedback);

        // 4. Call the model within the configured deadline
        let raw_response = tokio::time::timeout(
            self.settings.llm_timeout,
            self.llm_client
                .generate_with_image(prompt, input.image, get_recipe_analysis_schema()),
        )
        .await
        .map_err(|_| {
            tracing::error!(timeout = ?self.settings.llm_timeout, "model call timed out");
            CoreError::UpstreamFailed(format!(
                "Model did not respond within {} seconds",
                self.settings.llm_timeout.as_secs()
            ))
        })?
        .map_err(|e| match e {
            CoreError::UpstreamFailed(message) => CoreError::UpstreamFailed(message),
            other => CoreError::UpstreamFailed(other.to_string()),
        })?;

        // 5. Parse and validate
        let mut analysis = parse_model_response(&raw_response)?;

        if analysis.detected_ingredients.len() < MIN_DETECTED_INGREDIENTS {
            tracing::info!(
                detected = analysis.detected_ingredients.len(),
                "rejecting analysis with too few ingredients"
            );
            return Err(CoreError::ValidationFailed(
                NOT_ENOUGH_INGREDIENTS.to_string(),
            ));
        }

        for violation in dietary_violations(&analysis, &preferences) {
            tracing::warn!(
                recipe = %violation.recipe,
                ingredient = %violation.ingredient,
                reason = ?violation.reason,
                "model suggested an ingredient that breaks the user's constraints"
            );
        }

        // 6. Enrich with tutorial videos
        let report = self.enrich_with_videos(&mut analysis.recipes).await;
        tracing::debug!(
            attempted = report.attempted,
            enriched = report.enriched,
            not_found = report.not_found,
            failed = report.failed,
            "video enrichment finished"
        );

        // 7. Record history for signed-in users
        if let Some(identity) = identity {
            self.record_history(identity, &analysis, preferences).await;
        }

        tracing::info!(
            recipes = analysis.recipes.len(),
            ingredients = analysis.detected_ingredients.len(),
            "food analysis completed"
        );

        Ok(analysis)
    }
}

impl<S, LLM, V, A> Service<S, LLM, V, A>
where
    S: DocumentStore,
    LLM: LLMClient,
    V: VideoLookup,
    A: Send + Sync,
{
    async fn recent_feedback(&self, identity: Option<&Identity>) -> Vec<FeedbackEntry> {
        let Some(identity) = identity else {
            return Vec::new();
        };
        if !self.settings.feedback_aware_prompts {
            return Vec::new();
        }

        self.list_feedback(identity.clone(), Some(FEEDBACK_PROMPT_LIMIT))
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "could not load feedback for the prompt");
                Vec::new()
            })
    }

    /// One lookup per recipe with a query, run concurrently. A failed lookup
    /// only leaves its own recipe without a video.
    async fn enrich_with_videos(&self, recipes: &mut [RecipeSuggestion]) -> EnrichmentReport {
        let video_lookup = self.video_lookup.as_ref();

        let lookups = recipes.iter().enumerate().filter_map(|(index, recipe)| {
            let query = recipe.youtube_query.clone()?;
            Some(async move { (index, video_lookup.search_video(query).await) })
        });

        let outcomes: Vec<(usize, Result<Option<VideoMatch>, CoreError>)> =
            join_all(lookups).await;

        let mut report = EnrichmentReport {
            attempted: outcomes.len(),
            ..Default::default()
        };

        for (index, outcome) in outcomes {
            match outcome {
                Ok(Some(video)) => {
                    if let Some(recipe) = recipes.get_mut(index) {
                        recipe.youtube_video_id = Some(video.video_id);
                        recipe.youtube_thumbnail_url = video.thumbnail_url;
                        report.enriched += 1;
                    }
                }
                Ok(None) => report.not_found += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(recipe_index = index, error = %e, "video lookup failed");
                }
            }
        }

        report
    }

    /// Best effort: a failed write is logged and the analysis still succeeds.
    async fn record_history(
        &self,
        identity: Identity,
        analysis: &RecipeAnalysis,
        preferences: UserPreferences,
    ) {
        if let Err(e) = self
            .record_analysis(identity, analysis.clone(), preferences)
            .await
        {
            tracing::error!(error = %e, "could not save food history");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            common::services::ServiceSettings,
            feedback::value_objects::SubmitFeedbackInput,
            food_analysis::value_objects::ImageInput,
            storage::entities::{StoreErrorKind, into_object},
        },
        testing::{ScriptedLlm, ScriptedVideo, analysis_json, identity, service_with},
    };
    use bytes::Bytes;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    fn input() -> AnalyzeFoodInput {
        AnalyzeFoodInput {
            image: ImageInput {
                data: Bytes::from_static(b"\xff\xd8\xff"),
                mime_type: "image/jpeg".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_one_ingredient_is_rejected_two_are_accepted() {
        let (one, _d1) = service_with(
            ScriptedLlm::replying(analysis_json(&["egg"], &["Fried Egg"])),
            ScriptedVideo::default(),
            ServiceSettings::default(),
        );
        let (two, _d2) = service_with(
            ScriptedLlm::replying(analysis_json(&["egg", "tomato"], &["Shakshuka"])),
            ScriptedVideo::default(),
            ServiceSettings::default(),
        );

        let rejected = one.analyze_food(None, input()).await;
        let accepted = two.analyze_food(None, input()).await;

        assert_eq!(
            rejected,
            Err(CoreError::ValidationFailed(NOT_ENOUGH_INGREDIENTS.to_string()))
        );
        assert_eq!(accepted.map(|a| a.detected_ingredients.len()), Ok(2));
    }

    #[tokio::test]
    async fn test_guest_uses_defaults_and_writes_nothing() {
        let (service, _dir) = service_with(
            ScriptedLlm::replying(analysis_json(&["egg", "tomato"], &["Shakshuka"])),
            ScriptedVideo::default(),
            ServiceSettings::default(),
        );

        service.analyze_food(None, input()).await.expect("analysis");

        let prompt = service.llm_client.last_prompt().expect("prompt");
        for (key, value) in UserPreferences::defaults().ordered_entries() {
            assert!(prompt.contains(&format!("({key}): {value}")));
        }
        assert_eq!(service.document_store.append_count(), 0);
    }

    #[tokio::test]
    async fn test_history_snapshot_matches_preferences_at_analysis_time() {
        let (service, _dir) = service_with(
            ScriptedLlm::replying(analysis_json(&["tofu", "rice"], &["Tofu Bowl", "Fried Rice"])),
            ScriptedVideo::default(),
            ServiceSettings::default(),
        );
        let user = identity("user-1");

        let preferences = service
            .update_preferences(user.clone(), into_object(json!({"diet_type": "vegan"})))
            .await
            .expect("preferences");
        service
            .analyze_food(Some(user.clone()), input())
            .await
            .expect("analysis");

        let history = service.get_food_history(user).await.expect("history");

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].preferences_used, preferences);
        assert_eq!(
            history[0].detected_ingredients,
            vec!["tofu".to_string(), "rice".to_string()]
        );
        assert_eq!(
            history[0].recipes_generated,
            vec!["Tofu Bowl".to_string(), "Fried Rice".to_string()]
        );
    }

    #[tokio::test]
    async fn test_failed_video_lookup_only_affects_its_recipe() {
        let (service, _dir) = service_with(
            ScriptedLlm::replying(analysis_json(
                &["egg", "tomato", "onion"],
                &["One", "Two", "Three", "Four"],
            )),
            ScriptedVideo::failing_on(&["Two recipe"]),
            ServiceSettings::default(),
        );

        let analysis = service.analyze_food(None, input()).await.expect("analysis");

        assert_eq!(analysis.recipes.len(), 4);
        assert_eq!(analysis.recipes[1].youtube_video_id, None);
        for index in [0, 2, 3] {
            assert_eq!(
                analysis.recipes[index].youtube_video_id,
                Some(format!("video-{} recipe", analysis.recipes[index].name))
            );
        }
    }

    #[tokio::test]
    async fn test_fenced_model_output_is_accepted() {
        let fenced = format!("```json\n{}\n```", analysis_json(&["egg", "tomato"], &["Shakshuka"]));
        let (service, _dir) = service_with(
            ScriptedLlm::replying(fenced),
            ScriptedVideo::default(),
            ServiceSettings::default(),
        );

        let analysis = service.analyze_food(None, input()).await.expect("analysis");
        assert_eq!(analysis.ranking, vec!["Shakshuka".to_string()]);
    }

    #[tokio::test]
    async fn test_model_errors_are_upstream_failures() {
        let (failing, _d1) = service_with(
            ScriptedLlm::failing("quota exceeded"),
            ScriptedVideo::default(),
            ServiceSettings::default(),
        );
        let (garbage, _d2) = service_with(
            ScriptedLlm::replying("I think this is a salad".to_string()),
            ScriptedVideo::default(),
            ServiceSettings::default(),
        );

        assert_eq!(
            failing.analyze_food(None, input()).await,
            Err(CoreError::UpstreamFailed("quota exceeded".to_string()))
        );
        assert!(matches!(
            garbage.analyze_food(None, input()).await,
            Err(CoreError::UpstreamFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_slow_model_times_out() {
        let (service, _dir) = service_with(
            ScriptedLlm::replying(analysis_json(&["egg", "tomato"], &["Shakshuka"]))
                .delayed(Duration::from_millis(500)),
            ScriptedVideo::default(),
            ServiceSettings {
                llm_timeout: Duration::from_millis(20),
                ..ServiceSettings::default()
            },
        );

        let result = service.analyze_food(None, input()).await;
        assert!(matches!(result, Err(CoreError::UpstreamFailed(_))));
    }

    #[tokio::test]
    async fn test_history_failure_does_not_fail_the_analysis() {
        let (service, _dir) = service_with(
            ScriptedLlm::replying(analysis_json(&["egg", "tomato"], &["Shakshuka"])),
            ScriptedVideo::default(),
            ServiceSettings::default(),
        );
        service
            .document_store
            .fail_appends_with(StoreErrorKind::Internal);

        let result = service.analyze_food(Some(identity("user-1")), input()).await;

        assert!(result.is_ok());
        assert_eq!(service.document_store.append_count(), 1);
    }

    #[tokio::test]
    async fn test_feedback_reaches_the_prompt_only_when_enabled() {
        let reply = analysis_json(&["egg", "tomato"], &["Shakshuka"]);
        let user = identity("user-1");
        let feedback = SubmitFeedbackInput {
            recipe_name: "Lentil Curry".to_string(),
            feedback_type: "too_hard".to_string(),
        };

        let (enabled, _d1) = service_with(
            ScriptedLlm::replying(reply.clone()),
            ScriptedVideo::default(),
            ServiceSettings {
                feedback_aware_prompts: true,
                ..ServiceSettings::default()
            },
        );
        let (disabled, _d2) = service_with(
            ScriptedLlm::replying(reply),
            ScriptedVideo::default(),
            ServiceSettings::default(),
        );

        for service in [&enabled, &disabled] {
            service
                .submit_feedback(user.clone(), feedback.clone())
                .await
                .expect("feedback");
            service
                .analyze_food(Some(user.clone()), input())
                .await
                .expect("analysis");
        }

        let enabled_prompt = enabled.llm_client.last_prompt().expect("prompt");
        let disabled_prompt = disabled.llm_client.last_prompt().expect("prompt");

        assert!(enabled_prompt.contains("Recipe 'Lentil Curry': too_hard"));
        assert!(!disabled_prompt.contains("RECENT FEEDBACK"));
        assert_eq!(
            enabled.list_feedback(user, None).await.map(|f| f.len()),
            Ok(1)
        );
    }
}
