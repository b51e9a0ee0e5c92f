//! Gemini Client (API Key-based)
//!
//! Calls the Generative Language REST API `generateContent` endpoint with a
//! response schema, so the model replies with a single JSON document that
//! deserializes into `GeneratedContent`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::error::{GenerationError, Result};
use super::prompt::{build_prompt, SYSTEM_INSTRUCTION};
use super::schema::response_schema;
use super::{ContentGenerator, GenerationRequest};
use crate::config::GeminiConfig;
use crate::core::content::GeneratedContent;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Stateless Gemini client. Each `generate` call is one round trip.
pub struct GeminiClient {
    api_key: Option<String>,
    api_key_env: String,
    model: String,
    base_url: String,
    client: Client,
}

impl GeminiClient {
    /// Build a client. A `None` or blank key yields an unconfigured client
    /// whose requests fail before any network call.
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Result<Self> {
        Self::with_options(api_key, model, DEFAULT_BASE_URL, None)
    }

    pub fn from_config(config: &GeminiConfig) -> Result<Self> {
        let mut client = Self::with_options(
            config.resolve_api_key(),
            config.model.clone(),
            config.base_url.clone(),
            config.timeout_secs.map(Duration::from_secs),
        )?;
        client.api_key_env = config.api_key_env.clone();
        Ok(client)
    }

    /// Full constructor. Without `timeout` the transport's default applies.
    pub fn with_options(
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            api_key: api_key
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            api_key_env: crate::config::DEFAULT_API_KEY_ENV.to_string(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Assemble the JSON body: prompt part first, then one inline part per
    /// image in draft order.
    pub fn build_body(request: &GenerationRequest) -> Value {
        let prompt = build_prompt(&request.text, request.refinement.as_deref());

        let mut parts = vec![json!({ "text": prompt })];
        parts.extend(request.images.iter().map(|img| {
            json!({
                "inlineData": {
                    "mimeType": img.mime_type,
                    "data": img.data,
                }
            })
        }));

        json!({
            "contents": [{
                "role": "user",
                "parts": parts,
            }],
            "systemInstruction": {
                "parts": [{ "text": SYSTEM_INSTRUCTION }]
            },
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
            }
        })
    }

    /// Concatenate the text parts of the first candidate.
    pub fn extract_text(response: &Value) -> Option<String> {
        let parts = response["candidates"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|c| c["content"]["parts"].as_array())?;

        let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Parse a full `generateContent` response body into content.
    pub fn parse_response(response: &Value) -> Result<GeneratedContent> {
        let text = Self::extract_text(response).ok_or(GenerationError::EmptyResponse)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedContent> {
        let Some(api_key) = self.api_key.as_deref() else {
            log::error!("Generation requested but {} is not set", self.api_key_env);
            return Err(GenerationError::NotConfigured {
                env_var: self.api_key_env.clone(),
            });
        };

        let request_id = uuid::Uuid::new_v4();
        log::debug!(
            "[{request_id}] generateContent model={} images={} refinement={}",
            self.model,
            request.images.len(),
            request.is_refinement()
        );

        let body = Self::build_body(&request);
        let start = std::time::Instant::now();

        let resp = self
            .client
            .post(self.endpoint())
            .header("content-type", "application/json")
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                log::error!("[{request_id}] Gemini request failed: {e}");
                GenerationError::Http(e)
            })?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            log::error!("[{request_id}] Gemini API error {status}: {message}");
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let json: Value = resp.json().await?;
        let content = Self::parse_response(&json).map_err(|e| {
            log::error!("[{request_id}] Unusable Gemini response: {e}");
            e
        })?;

        log::info!(
            "[{request_id}] Generated adaptations in {}ms",
            start.elapsed().as_millis()
        );
        Ok(content)
    }
}
