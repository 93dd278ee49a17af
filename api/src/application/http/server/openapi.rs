use crate::application::http::{
    feedback::router::FeedbackApiDoc, food_analysis::router::FoodAnalysisApiDoc,
    food_history::router::FoodHistoryApiDoc, health::router::HealthApiDoc,
    preferences::router::PreferencesApiDoc, profile::router::ProfileApiDoc,
    saved_recipe::router::SavedRecipeApiDoc,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "NutriSnap API"
    ),
    nest(
        (path = "/api", api = HealthApiDoc),
        (path = "/api/analyze-food", api = FoodAnalysisApiDoc),
        (path = "/api/preferences", api = PreferencesApiDoc),
        (path = "/api/profile", api = ProfileApiDoc),
        (path = "/api/food-history", api = FoodHistoryApiDoc),
        (path = "/api/saved-recipes", api = SavedRecipeApiDoc),
        (path = "/api/feedback", api = FeedbackApiDoc),
    )
)]
pub struct ApiDoc;
