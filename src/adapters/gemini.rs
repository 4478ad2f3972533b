//! Suggestion source backed by the Gemini `generateContent` REST endpoint.

use crate::domain::model::{ServiceCategory, SuggestedItem};
use crate::domain::ports::{ConfigProvider, SuggestionSource};
use crate::utils::error::{EstimatorError, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use strum::IntoEnumIterator;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
const PROVIDER: &str = "gemini";

pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<SecretString>,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if any.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl GeminiClient {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<SecretString>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(
            config.ai_endpoint(),
            config.ai_model(),
            config.api_key().cloned(),
        )
        .with_timeout(config.request_timeout())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_credential(&self) -> bool {
        self.credential().is_some()
    }

    fn credential(&self) -> Option<&SecretString> {
        self.api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    fn request_body(description: &str) -> serde_json::Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": build_prompt(description) }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "serviceName": { "type": "STRING" },
                            "category": { "type": "STRING" },
                            "description": { "type": "STRING" },
                            "estimatedMonthlyCost": { "type": "NUMBER" },
                            "quantity": { "type": "NUMBER" },
                            "reasoning": { "type": "STRING" }
                        },
                        "required": [
                            "serviceName",
                            "category",
                            "description",
                            "estimatedMonthlyCost",
                            "quantity",
                            "reasoning"
                        ]
                    }
                }
            }
        })
    }
}

pub fn build_prompt(description: &str) -> String {
    let categories = ServiceCategory::iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are an experienced Azure solutions architect.\n\
         Read the project description below and produce a Bill of Materials (BOM) \
         with estimated monthly costs.\n\n\
         Project description: \"{description}\"\n\n\
         Rules:\n\
         1. List the Azure services the project needs (compute, storage, database, networking, AI and so on).\n\
         2. Pick a sensible tier for a standard production workload when none is given.\n\
         3. Estimate the monthly USD cost of each line from public pay-as-you-go pricing; \
         estimatedMonthlyCost is the total for the line, not per unit.\n\
         4. Give each line a short description and reasoning.\n\
         5. category must be exactly one of: {categories}.\n"
    )
}

/// Drops a surrounding Markdown code fence if the model added one.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let body = rest.strip_prefix("json").unwrap_or(rest);
            body.strip_suffix("```").unwrap_or(body).trim()
        }
        None => trimmed,
    }
}

#[async_trait]
impl SuggestionSource for GeminiClient {
    async fn suggest(&self, description: &str) -> Result<Vec<SuggestedItem>> {
        let api_key = self
            .credential()
            .ok_or_else(|| EstimatorError::MissingCredential {
                provider: PROVIDER.to_string(),
            })?;

        let url = self.generate_url();
        tracing::debug!("Making Gemini request to: {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key.expose_secret())
            .timeout(self.timeout)
            .json(&Self::request_body(description))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Gemini response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EstimatorError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let reply: GenerateContentResponse = response.json().await?;
        let text = reply
            .text()
            .ok_or_else(|| EstimatorError::GenerationFailed {
                reason: "response contained no candidate text".to_string(),
            })?;

        let items: Vec<SuggestedItem> = serde_json::from_str(strip_code_fence(&text))?;
        tracing::debug!("Gemini suggested {} items", items.len());
        Ok(items)
    }
}
