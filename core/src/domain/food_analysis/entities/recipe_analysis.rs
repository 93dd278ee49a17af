use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::common::serde_lenient::{self, value_to_f64};

/// Validated model answer returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecipeAnalysis {
    #[serde(default, deserialize_with = "serde_lenient::text_list")]
    pub detected_ingredients: Vec<String>,
    #[serde(default)]
    pub recipes: Vec<RecipeSuggestion>,
    #[serde(default, deserialize_with = "serde_lenient::text_list")]
    pub ranking: Vec<String>,
}

impl RecipeAnalysis {
    pub fn recipe_names(&self) -> Vec<String> {
        self.recipes
            .iter()
            .map(|r| r.name.clone())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct RecipeSuggestion {
    #[serde(default, deserialize_with = "serde_lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "serde_lenient::text")]
    pub description: String,
    #[serde(default, deserialize_with = "serde_lenient::opt_u32")]
    pub servings: Option<u32>,
    #[serde(default, deserialize_with = "serde_lenient::text_list")]
    pub ingredients_used: Vec<String>,
    #[serde(default, deserialize_with = "serde_lenient::text_list")]
    pub additional_ingredients: Vec<String>,
    #[serde(default, deserialize_with = "serde_lenient::text_list")]
    pub instructions: Vec<String>,
    #[serde(default, deserialize_with = "nutrition")]
    pub nutrition: Nutrition,
    #[serde(default, deserialize_with = "health_score")]
    pub health_score: Option<u8>,
    #[serde(default, deserialize_with = "serde_lenient::text")]
    pub health_explanation: String,
    #[serde(default, deserialize_with = "serde_lenient::text_list")]
    pub diet_tags: Vec<String>,
    #[serde(default, deserialize_with = "serde_lenient::opt_u32")]
    pub estimated_time_minutes: Option<u32>,
    #[serde(
        default,
        deserialize_with = "serde_lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub youtube_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_video_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_thumbnail_url: Option<String>,
}

impl RecipeSuggestion {
    /// Every ingredient the recipe asks for, detected or additional.
    pub fn all_ingredients(&self) -> impl Iterator<Item = &String> {
        self.ingredients_used
            .iter()
            .chain(self.additional_ingredients.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct Nutrition {
    #[serde(default, alias = "calories", deserialize_with = "serde_lenient::opt_f64")]
    pub calories_kcal: Option<f64>,
    #[serde(default, alias = "protein", deserialize_with = "serde_lenient::opt_f64")]
    pub protein_g: Option<f64>,
    #[serde(
        default,
        alias = "carbs",
        alias = "carbohydrates_g",
        deserialize_with = "serde_lenient::opt_f64"
    )]
    pub carbs_g: Option<f64>,
    #[serde(default, alias = "fat", deserialize_with = "serde_lenient::opt_f64")]
    pub fat_g: Option<f64>,
}

fn nutrition<'de, D>(deserializer: D) -> Result<Nutrition, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(Nutrition::default());
    }

    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Rounded and clamped into 1..=10; absent when not a number.
fn health_score<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    Ok(value_to_f64(&value)
        .filter(|score| score.is_finite())
        .map(|score| score.round().clamp(1.0, 10.0) as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_loose_recipe_fields_are_coerced() {
        let recipe: RecipeSuggestion = serde_json::from_value(json!({
            "name": "Veggie Omelette",
            "servings": "2",
            "ingredients_used": ["egg", {"name": "spinach", "quantity": "1 cup"}],
            "nutrition": {"calories": "320 kcal", "protein_g": 18, "carbs": "12", "fat_g": null},
            "health_score": "14",
            "estimated_time_minutes": "15 minutes",
            "diet_tags": "vegetarian",
            "youtube_query": ""
        }))
        .expect("recipe");

        assert_eq!(recipe.servings, Some(2));
        assert_eq!(
            recipe.ingredients_used,
            vec!["egg".to_string(), "spinach (1 cup)".to_string()]
        );
        assert_eq!(recipe.nutrition.calories_kcal, Some(320.0));
        assert_eq!(recipe.nutrition.carbs_g, Some(12.0));
        assert_eq!(recipe.nutrition.fat_g, None);
        assert_eq!(recipe.health_score, Some(10));
        assert_eq!(recipe.estimated_time_minutes, Some(15));
        assert_eq!(recipe.diet_tags, vec!["vegetarian".to_string()]);
        assert_eq!(recipe.youtube_query, None);
    }

    #[test]
    fn test_health_score_bounds() {
        let low: RecipeSuggestion =
            serde_json::from_value(json!({"health_score": 0.2})).expect("recipe");
        let unknown: RecipeSuggestion =
            serde_json::from_value(json!({"health_score": "great"})).expect("recipe");

        assert_eq!(low.health_score, Some(1));
        assert_eq!(unknown.health_score, None);
    }

    #[test]
    fn test_enrichment_fields_are_omitted_until_set() {
        let value = serde_json::to_value(RecipeSuggestion::default()).expect("json");
        assert!(value.get("youtube_video_id").is_none());
        assert!(value.get("youtube_thumbnail_url").is_none());
    }
}
