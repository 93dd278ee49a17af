use base64::{Engine as _, engine::general_purpose};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        common::entities::app_errors::CoreError,
        food_analysis::{ports::LLMClient, value_objects::ImageInput},
    },
    infrastructure::google_auth::GoogleTokenSource,
};

const GENERATIVE_LANGUAGE_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// How requests are addressed and authenticated.
#[derive(Debug, Clone)]
pub enum GeminiBackend {
    /// Generative Language API with an API key.
    ApiKey(String),
    /// Vertex AI with a service account bearer token.
    Vertex {
        project_id: String,
        location: String,
        token_source: GoogleTokenSource,
    },
}

#[derive(Debug, Clone)]
pub struct GeminiLLMClient {
    backend: GeminiBackend,
    model_name: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiLLMClient {
    pub fn new(backend: GeminiBackend, model_name: String, client: Client) -> Self {
        Self {
            backend,
            model_name,
            client,
        }
    }

    fn endpoint(&self) -> String {
        match &self.backend {
            GeminiBackend::ApiKey(_) => format!(
                "{}/models/{}:generateContent",
                GENERATIVE_LANGUAGE_ENDPOINT, self.model_name
            ),
            GeminiBackend::Vertex {
                project_id,
                location,
                ..
            } => format!(
                "https://{location}-aiplatform.googleapis.com/v1/projects/{project_id}/locations/{location}/publishers/google/models/{}:generateContent",
                self.model_name
            ),
        }
    }

    async fn call_gemini_api(&self, request: GeminiRequest) -> Result<String, CoreError> {
        let mut builder = self.client.post(self.endpoint()).json(&request);

        builder = match &self.backend {
            GeminiBackend::ApiKey(api_key) => builder.header("x-goog-api-key", api_key),
            GeminiBackend::Vertex { token_source, .. } => {
                match token_source.access_token().await? {
                    Some(token) => builder.bearer_auth(token),
                    None => builder,
                }
            }
        };

        let response = builder.send().await.map_err(|e| {
            tracing::error!("Gemini API request failed: {}", e);
            CoreError::UpstreamFailed(format!("LLM API error: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini API error: {} - {}", status, error_text);
            return Err(CoreError::UpstreamFailed(format!(
                "LLM API returned error: {} - {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            CoreError::UpstreamFailed(format!("Failed to parse LLM response: {}", e))
        })?;

        first_candidate_text(gemini_response)
            .ok_or_else(|| CoreError::UpstreamFailed("No response from LLM".to_string()))
    }
}

/// Concatenated text parts of the first candidate.
fn first_candidate_text(response: GeminiResponse) -> Option<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    (!text.trim().is_empty()).then_some(text)
}

impl LLMClient for GeminiLLMClient {
    async fn generate_with_image(
        &self,
        prompt: String,
        image: ImageInput,
        response_schema: serde_json::Value,
    ) -> Result<String, CoreError> {
        let base64_image = general_purpose::STANDARD.encode(&image.data);

        let request = GeminiRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type,
                            data: base64_image,
                        },
                    },
                    Part::Text { text: prompt },
                ],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema,
            }),
        };

        self.call_gemini_api(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_parts_are_concatenated() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [{"text": "{\"a\":"}, {"text": " 1}"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }))
        .expect("response");

        assert_eq!(first_candidate_text(response), Some("{\"a\": 1}".to_string()));
    }

    #[test]
    fn test_blocked_candidate_has_no_text() {
        let response: GeminiResponse =
            serde_json::from_value(json!({"candidates": [{"finishReason": "SAFETY"}]}))
                .expect("response");
        assert_eq!(first_candidate_text(response), None);
    }

    #[test]
    fn test_endpoints_per_backend() {
        let api_key = GeminiLLMClient::new(
            GeminiBackend::ApiKey("key".into()),
            "gemini-2.5-flash".into(),
            Client::new(),
        );
        let vertex = GeminiLLMClient::new(
            GeminiBackend::Vertex {
                project_id: "p".into(),
                location: "us-central1".into(),
                token_source: GoogleTokenSource::Anonymous,
            },
            "gemini-2.5-flash".into(),
            Client::new(),
        );

        assert_eq!(
            api_key.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(
            vertex.endpoint(),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/p/locations/us-central1/publishers/google/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_image_part_comes_first() {
        let request = GeminiRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/png".into(),
                            data: "AAAA".into(),
                        },
                    },
                    Part::Text { text: "prompt".into() },
                ],
            }],
            generation_config: None,
        };

        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["contents"][0]["parts"][0]["inline_data"]["mime_type"], "image/png");
        assert_eq!(value["contents"][0]["parts"][1]["text"], "prompt");
        assert!(value.get("generation_config").is_none());
    }
}
