use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use super::generator::{GenerationError, TextGenerator};

const MODEL_PREFIX: &str = "models/";

/// Client for the Generative Language REST API (`generateContent` and model listing).
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
        })
    }

    fn generate_url(&self, model: &str) -> String {
        let model = model.strip_prefix(MODEL_PREFIX).unwrap_or(model);
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    async fn check_status(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GenerationError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "failed to read error body".to_string());
        error!(%status, %body, "Gemini API request failed");
        Err(GenerationError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TextGenerator for GeminiClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerationError> {
        let payload = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        let response = self
            .http
            .post(self.generate_url(model))
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let body = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|err| GenerationError::MalformedResponse(err.to_string()))?;

        let text = body.text();
        debug!(%model, chars = text.len(), "received Gemini reply");
        Ok(text)
    }

    async fn list_models(&self) -> Result<Vec<String>, GenerationError> {
        let response = self
            .http
            .get(format!("{}/v1beta/models", self.base_url))
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let body = response
            .json::<ListModelsResponse>()
            .await
            .map_err(|err| GenerationError::MalformedResponse(err.to_string()))?;

        Ok(body
            .models
            .into_iter()
            .map(|model| {
                model
                    .name
                    .strip_prefix(MODEL_PREFIX)
                    .map(str::to_string)
                    .unwrap_or(model.name)
            })
            .filter(|name| !name.is_empty())
            .collect())
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateContentResponse {
    /// Text parts of the first candidate that has any, joined by newlines.
    fn text(&self) -> String {
        self.candidates
            .iter()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .map(str::trim)
                    .filter(|text| !text.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .find(|text| !text.is_empty())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    name: String,
}
