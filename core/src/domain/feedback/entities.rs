use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{common::serde_lenient, storage::entities::Document};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FeedbackEntry {
    #[serde(default, deserialize_with = "serde_lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "serde_lenient::text")]
    pub recipe_name: String,
    #[serde(default, deserialize_with = "serde_lenient::text")]
    pub feedback_type: String,
    #[serde(default, deserialize_with = "serde_lenient::opt_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl FeedbackEntry {
    /// Entries without a recipe name or a feedback type are skipped.
    pub fn from_document(document: &Document) -> Option<Self> {
        let entry: FeedbackEntry = serde_json::from_value(Value::Object(document.clone()))
            .map_err(|e| tracing::warn!(error = %e, "skipping unreadable feedback entry"))
            .ok()?;

        (!entry.recipe_name.is_empty() && !entry.feedback_type.is_empty()).then_some(entry)
    }

    pub fn sentiment(&self) -> FeedbackSentiment {
        classify_feedback_type(&self.feedback_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackSentiment {
    Negative,
    Positive,
    Neutral,
}

const NEGATIVE_FEEDBACK: &[&str] = &[
    "too_hard",
    "too_difficult",
    "too_complex",
    "too_long",
    "too_slow",
    "too_spicy",
    "too_bland",
    "disliked",
    "dislike",
    "didnt_like",
    "not_tasty",
    "bad",
    "thumbs_down",
];

const POSITIVE_FEEDBACK: &[&str] = &[
    "liked",
    "like",
    "loved",
    "love",
    "great",
    "delicious",
    "tasty",
    "easy",
    "would_make_again",
    "thumbs_up",
];

/// `"Too Hard"`, `"too-hard"` and `"too_hard"` classify the same way.
pub fn classify_feedback_type(feedback_type: &str) -> FeedbackSentiment {
    let normalized: String = feedback_type
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| *c != '\'')
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect();

    if NEGATIVE_FEEDBACK.contains(&normalized.as_str()) {
        FeedbackSentiment::Negative
    } else if POSITIVE_FEEDBACK.contains(&normalized.as_str()) {
        FeedbackSentiment::Positive
    } else {
        FeedbackSentiment::Neutral
    }
}
