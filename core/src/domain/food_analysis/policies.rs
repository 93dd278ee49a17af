use crate::domain::{
    food_analysis::entities::{RecipeAnalysis, RecipeSuggestion},
    preferences::entities::UserPreferences,
    prompt::policies::{ANIMAL_PRODUCTS, DietClass, PLANT_QUALIFIERS, allergens},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationReason {
    Allergen(String),
    Diet(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DietaryViolation {
    pub recipe: String,
    pub ingredient: String,
    pub reason: ViolationReason,
}

/// Ingredients of the model's recipes that break the user's allergies or
/// diet. Used to flag model output, never to reject it.
pub fn dietary_violations(
    analysis: &RecipeAnalysis,
    preferences: &UserPreferences,
) -> Vec<DietaryViolation> {
    let allergens = allergens(preferences);
    let diet = DietClass::from_diet_type(preferences.get("diet_type").unwrap_or_default());
    let excluded = diet.excluded_keywords();

    analysis
        .recipes
        .iter()
        .flat_map(|recipe| recipe_violations(recipe, &allergens, &excluded))
        .collect()
}

fn recipe_violations(
    recipe: &RecipeSuggestion,
    allergens: &[String],
    excluded: &[&'static str],
) -> Vec<DietaryViolation> {
    let mut violations = Vec::new();

    for ingredient in recipe.all_ingredients() {
        let lowered = ingredient.to_lowercase();

        if let Some(allergen) = allergens.iter().find(|a| mentions_allergen(&lowered, a)) {
            violations.push(DietaryViolation {
                recipe: recipe.name.clone(),
                ingredient: ingredient.clone(),
                reason: ViolationReason::Allergen(allergen.clone()),
            });
            continue;
        }

        if let Some(keyword) = excluded_keyword(&lowered, excluded) {
            violations.push(DietaryViolation {
                recipe: recipe.name.clone(),
                ingredient: ingredient.clone(),
                reason: ViolationReason::Diet(keyword),
            });
        }
    }

    violations
}

fn mentions_allergen(ingredient: &str, allergen: &str) -> bool {
    if ingredient.contains(allergen) {
        return true;
    }

    let singular = allergen.trim_end_matches('s');
    singular.len() > 3 && ingredient.contains(singular)
}

/// Whole-word match so that "eggplant" is not an egg. Dairy words preceded
/// by a plant qualifier ("almond milk") do not count.
fn excluded_keyword(ingredient: &str, excluded: &[&'static str]) -> Option<&'static str> {
    if ingredient.contains("vegan") || ingredient.contains("plant-based") {
        return None;
    }

    let words: Vec<&str> = ingredient
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    for (index, word) in words.iter().enumerate() {
        let Some(keyword) = excluded.iter().find(|k| is_word_form(word, k)) else {
            continue;
        };

        let plant_based = ANIMAL_PRODUCTS.contains(keyword)
            && index > 0
            && PLANT_QUALIFIERS.contains(&words[index - 1]);

        if !plant_based {
            return Some(*keyword);
        }
    }

    None
}

fn is_word_form(word: &str, keyword: &str) -> bool {
    word == keyword
        || word.strip_suffix('s') == Some(keyword)
        || word.strip_suffix("es") == Some(keyword)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::entities::into_object;
    use serde_json::json;

    fn analysis(ingredients: &[&str]) -> RecipeAnalysis {
        serde_json::from_value(json!({
            "detected_ingredients": ["a", "b"],
            "recipes": [{"name": "Bowl", "ingredients_used": ingredients}],
            "ranking": []
        }))
        .expect("analysis")
    }

    fn prefs(value: serde_json::Value) -> UserPreferences {
        UserPreferences::resolve(&into_object(value))
    }

    #[test]
    fn test_chicken_in_a_vegan_recipe_is_flagged() {
        let violations = dietary_violations(
            &analysis(&["rice", "grilled chicken breast"]),
            &prefs(json!({"diet_type": "vegan"})),
        );

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].reason, ViolationReason::Diet("chicken"));
        assert_eq!(violations[0].ingredient, "grilled chicken breast");
    }

    #[test]
    fn test_plant_based_lookalikes_are_not_flagged() {
        let violations = dietary_violations(
            &analysis(&["eggplant", "almond milk", "peanut butter", "vegan cheese"]),
            &prefs(json!({"diet_type": "vegan"})),
        );

        assert!(violations.is_empty(), "{:?}", violations);
    }

    #[test]
    fn test_allergens_are_flagged_for_any_diet() {
        let violations = dietary_violations(
            &analysis(&["crushed peanut", "lime"]),
            &prefs(json!({"allergies": "peanuts"})),
        );

        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].reason,
            ViolationReason::Allergen("peanuts".to_string())
        );
    }

    #[test]
    fn test_unrestricted_diet_allows_meat() {
        let violations = dietary_violations(
            &analysis(&["beef", "eggs"]),
            &UserPreferences::defaults(),
        );
        assert!(violations.is_empty());
    }
}
