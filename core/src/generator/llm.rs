//! Hosted LLM Generator
//!
//! One reqwest client speaking the three provider APIs directly. Only the
//! non-streaming endpoints are used: a generation request is a single prompt
//! and a single JSON answer.
//!
//! # Endpoints
//!
//! - openai: `POST /v1/chat/completions`, bearer auth
//! - anthropic: `POST /v1/messages`, `x-api-key` header
//! - google: `POST /v1beta/models/{model}:generateContent?key=...`

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::prompt::{build_prompt, parse_tips};
use super::traits::{classify_failure, GenerateError, ModelSpec, Provider, TipGenerator};
use crate::config::TipsConfig;

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Upper bound on generated tokens for providers that require one
const MAX_OUTPUT_TOKENS: u32 = 4096;

/// Generator backed by a hosted LLM
#[derive(Clone)]
pub struct LlmTipGenerator {
    spec: ModelSpec,
    api_key: String,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for LlmTipGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmTipGenerator")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

impl LlmTipGenerator {
    /// Create from explicit parts
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn from_parts(
        spec: ModelSpec,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerateError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerateError::Request(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            spec,
            api_key: api_key.into(),
            http_client,
        })
    }

    /// Create from resolved configuration
    ///
    /// The API key is read from the provider's environment variable.
    ///
    /// # Errors
    ///
    /// Fails on a malformed model spec, an unknown provider or a missing key.
    pub fn from_config(config: &TipsConfig) -> Result<Self, GenerateError> {
        let spec: ModelSpec = config.model.parse()?;
        let var = spec.provider.api_key_var();
        let api_key = std::env::var(var)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(GenerateError::MissingApiKey { var })?;

        Self::from_parts(spec, api_key, config.request_timeout)
    }

    /// The model this generator talks to
    #[must_use]
    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    fn request_for(&self, prompt: &str) -> reqwest::RequestBuilder {
        match self.spec.provider {
            Provider::OpenAi => self
                .http_client
                .post(OPENAI_URL)
                .bearer_auth(&self.api_key)
                .json(&json!({
                    "model": self.spec.model,
                    "messages": [{ "role": "user", "content": prompt }],
                })),
            Provider::Anthropic => self
                .http_client
                .post(ANTHROPIC_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&json!({
                    "model": self.spec.model,
                    "max_tokens": MAX_OUTPUT_TOKENS,
                    "messages": [{ "role": "user", "content": prompt }],
                })),
            Provider::Google => self
                .http_client
                .post(format!("{GOOGLE_BASE_URL}/{}:generateContent", self.spec.model))
                .query(&[("key", self.api_key.as_str())])
                .json(&json!({
                    "contents": [{ "parts": [{ "text": prompt }] }],
                    "generationConfig": { "maxOutputTokens": MAX_OUTPUT_TOKENS },
                })),
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String, GenerateError> {
        let response = self
            .request_for(prompt)
            .send()
            .await
            .map_err(|e| classify_failure(None, &e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classify_failure(Some(status.as_u16()), &e.to_string()))?;

        if !status.is_success() {
            return Err(classify_failure(Some(status.as_u16()), &error_message(&body)));
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            GenerateError::Request(format!("{} returned malformed JSON: {e}", self.spec.provider))
        })?;

        extract_text(self.spec.provider, &value).ok_or_else(|| {
            GenerateError::Request(format!("{} response contained no text", self.spec.provider))
        })
    }
}

/// Pull the provider's error message out of an error body, if it has one
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

/// Extract the completion text from a provider response
fn extract_text(provider: Provider, value: &Value) -> Option<String> {
    match provider {
        Provider::OpenAi => value
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string),
        Provider::Anthropic => join_text(value.get("content")?.as_array()?, "/text"),
        Provider::Google => join_text(
            value.pointer("/candidates/0/content/parts")?.as_array()?,
            "/text",
        ),
    }
}

fn join_text(blocks: &[Value], pointer: &str) -> Option<String> {
    let text: String = blocks
        .iter()
        .filter_map(|b| b.pointer(pointer).and_then(Value::as_str))
        .collect();
    (!text.is_empty()).then_some(text)
}

#[async_trait]
impl TipGenerator for LlmTipGenerator {
    fn name(&self) -> String {
        self.spec.to_string()
    }

    async fn generate(&self, topic: &str, count: u32) -> Result<Vec<String>, GenerateError> {
        let start = Instant::now();
        let prompt = build_prompt(topic, count);

        tracing::debug!(model = %self.spec, topic, count, "Requesting tips");
        let text = self.complete(&prompt).await?;
        let tips = parse_tips(&text)?;

        tracing::info!(
            model = %self.spec,
            topic,
            received = tips.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Generated tips"
        );
        Ok(tips)
    }
}
