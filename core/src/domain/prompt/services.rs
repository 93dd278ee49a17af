use std::fmt::Write;

use crate::domain::{
    feedback::entities::{FeedbackEntry, FeedbackSentiment},
    food_analysis::schema::recipe_response_template,
    preferences::entities::UserPreferences,
    prompt::policies::hard_constraints,
};

const ROLE: &str = "You are NutriSnap AI, an advanced multimodal nutrition and cooking assistant built to help users create healthy meals from available ingredients.

Your task is to analyze an image of food ingredients and generate healthy, personalized recipe suggestions.";

const EDGE_CASES: &str = "### EDGE CASES
If fewer than 2 ingredients are clearly visible, list what you can see in \"detected_ingredients\", suggest 2-3 common ingredients that would complete a meal in \"additional_ingredients\" and still return best-effort recipes.";

const JSON_ONLY: &str = "Response must be JSON only. Do not write any text outside the JSON object.";

/// Builds the model instruction for one analysis. The output depends only
/// on the arguments.
pub fn build_prompt(preferences: &UserPreferences, recent_feedback: &[FeedbackEntry]) -> String {
    let mut prompt = String::with_capacity(4096);

    prompt.push_str(ROLE);
    prompt.push_str("\n\n");

    if !recent_feedback.is_empty() {
        prompt.push_str(&feedback_section(recent_feedback));
        prompt.push_str("\n\n");
    }

    prompt.push_str(&preferences_section(preferences));
    prompt.push_str("\n\n");
    prompt.push_str(&output_section());
    prompt.push_str("\n\n");
    prompt.push_str(EDGE_CASES);
    prompt.push_str("\n\n");
    prompt.push_str(JSON_ONLY);
    prompt.push('\n');

    prompt
}

fn feedback_section(entries: &[FeedbackEntry]) -> String {
    let mut section = String::from(
        "### RECENT FEEDBACK\nAdapt your suggestions to how this user rated earlier recipes:",
    );

    for entry in entries {
        let hint = match entry.sentiment() {
            FeedbackSentiment::Negative => "simplify or avoid this style of recipe",
            FeedbackSentiment::Positive => "favor similar recipes",
            FeedbackSentiment::Neutral => "take this into account",
        };
        let _ = write!(
            section,
            "\n- Recipe '{}': {} ({})",
            entry.recipe_name, entry.feedback_type, hint
        );
    }

    section
}

fn preferences_section(preferences: &UserPreferences) -> String {
    let mut section = String::from(
        "### USER PROFILE & PREFERENCES\nTailor ALL recipes strictly to this user's profile:",
    );

    for (key, value) in preferences.ordered_entries() {
        let _ = write!(section, "\n- {} ({}): {}", label(key), key, value);
    }

    let constraints = hard_constraints(preferences);
    if !constraints.is_empty() {
        section.push_str("\n\n### HARD CONSTRAINTS");
        for constraint in constraints {
            let _ = write!(section, "\n- {}", constraint);
        }
    }

    section
}

fn output_section() -> String {
    let template = serde_json::to_string_pretty(&recipe_response_template()).unwrap_or_default();

    format!(
        "### OUTPUT FORMAT
Return ONLY valid JSON in this structure:
{template}

- Suggest 2 to 4 recipes.
- \"health_score\" is an integer from 1 to 10 measuring fit with the health goal.
- Order \"ranking\" by health alignment with the user's goals, best fit first, using the exact recipe names.
- \"youtube_query\" is a short search query that finds a video tutorial for the recipe."
    )
}

/// `cuisine_preferences` -> `Cuisine Preferences`
fn label(key: &str) -> String {
    match key {
        "allergies" => "Allergies / Restrictions".to_string(),
        "cooking_time" => "Cooking Time Preference".to_string(),
        _ => key
            .split('_')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}
