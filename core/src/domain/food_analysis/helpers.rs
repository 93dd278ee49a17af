use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{
    common::entities::app_errors::CoreError, food_analysis::entities::RecipeAnalysis,
};

/// Opening fence with an optional language label, the body, and an optional
/// closing fence.
static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)\s*(?:```\s*)?$")
        .expect("code fence pattern is valid")
});

/// Removes a markdown code fence wrapped around the model output.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    CODE_FENCE
        .captures(trimmed)
        .and_then(|captures| captures.get(1))
        .map(|body| body.as_str().trim())
        .unwrap_or(trimmed)
}

/// Strips any fence, parses the payload and normalizes the ranking.
pub fn parse_model_response(raw: &str) -> Result<RecipeAnalysis, CoreError> {
    let payload = strip_code_fence(raw);

    let mut analysis: RecipeAnalysis = serde_json::from_str(payload).map_err(|e| {
        tracing::error!("Failed to parse model response: {}", e);
        CoreError::UpstreamFailed(format!("Failed to parse model response: {}", e))
    })?;

    normalize_ranking(&mut analysis);

    Ok(analysis)
}

/// Makes `ranking` a permutation of the recipe names with one slot per
/// recipe: unknown names and names ranked more often than they occur are
/// dropped, unranked recipes are appended in response order.
pub fn normalize_ranking(analysis: &mut RecipeAnalysis) {
    let names = analysis.recipe_names();
    let mut remaining: HashMap<&str, usize> = HashMap::new();
    for name in &names {
        *remaining.entry(name.as_str()).or_default() += 1;
    }

    let mut ranking = Vec::with_capacity(names.len());

    for ranked in &analysis.ranking {
        let ranked = ranked.trim();
        let matched = names
            .iter()
            .find(|name| name.as_str() == ranked)
            .or_else(|| names.iter().find(|name| name.eq_ignore_ascii_case(ranked)));

        if let Some(name) = matched
            && let Some(slots) = remaining.get_mut(name.as_str())
            && *slots > 0
        {
            *slots -= 1;
            ranking.push(name.clone());
        }
    }

    for name in &names {
        if let Some(slots) = remaining.get_mut(name.as_str())
            && *slots > 0
        {
            *slots -= 1;
            ranking.push(name.clone());
        }
    }

    analysis.ranking = ranking;
}
