//! Generator Traits and Types
//!
//! The [`TipGenerator`] abstraction plus the pieces every implementation
//! shares: the `provider/model` spec and the error taxonomy.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from tip generation
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Model spec is not `provider/model`
    #[error("invalid model format '{0}'. Expected 'provider/model' (e.g., 'openai/gpt-4o')")]
    InvalidModel(String),

    /// Provider is not one of the supported ones
    #[error("unsupported provider: {0}. Supported providers: openai, anthropic, google")]
    UnsupportedProvider(String),

    /// The provider's API key variable is unset
    #[error("{var} environment variable not set. Please set it with: export {var}='your-api-key'")]
    MissingApiKey {
        /// Name of the environment variable
        var: &'static str,
    },

    /// The provider rejected the credentials
    #[error("invalid API key. Please check your API key environment variable")]
    InvalidApiKey,

    /// Quota exhausted or request throttled
    #[error("API quota exceeded or rate limited. Please try again later")]
    RateLimited,

    /// Any other request failure
    #[error("failed to generate content: {0}")]
    Request(String),

    /// The model answered with something that is not the expected JSON
    #[error("failed to parse response as JSON. Raw response: {raw}. Cleaned response: {cleaned}. Error: {source}")]
    Parse {
        /// Response text as received
        raw: String,
        /// Response text after fence stripping
        cleaned: String,
        /// The JSON error
        source: serde_json::Error,
    },

    /// The response parsed but held no tips
    #[error("no tips generated in response")]
    Empty,
}

/// Map a failed provider call onto a [`GenerateError`]
///
/// `status` is the HTTP status when one was received. Authentication
/// problems win over throttling, which wins over everything else.
#[must_use]
pub fn classify_failure(status: Option<u16>, message: &str) -> GenerateError {
    let lower = message.to_lowercase();

    if matches!(status, Some(401 | 403))
        || lower.contains("api key")
        || lower.contains("authentication")
    {
        return GenerateError::InvalidApiKey;
    }

    if status == Some(429)
        || lower.contains("quota")
        || lower.contains("rate limit")
        || lower.contains("rate_limit")
    {
        return GenerateError::RateLimited;
    }

    match status {
        Some(code) => GenerateError::Request(format!("HTTP {code}: {message}")),
        None => GenerateError::Request(message.to_string()),
    }
}

/// Supported LLM providers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    /// OpenAI chat completions
    OpenAi,
    /// Anthropic messages
    Anthropic,
    /// Google Gemini
    Google,
}

impl Provider {
    /// Environment variable holding the API key
    #[must_use]
    pub fn api_key_var(self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::Google => "GOOGLE_API_KEY",
        }
    }

    /// Name as written in model specs
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "google" => Ok(Self::Google),
            other => Err(GenerateError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// A parsed `provider/model` spec
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelSpec {
    /// Which API to call
    pub provider: Provider,
    /// Provider-specific model name
    pub model: String,
}

impl FromStr for ModelSpec {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        let (Some(provider), Some(model), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(GenerateError::InvalidModel(s.to_string()));
        };
        if provider.is_empty() || model.is_empty() {
            return Err(GenerateError::InvalidModel(s.to_string()));
        }

        Ok(Self {
            provider: provider.parse()?,
            model: model.to_string(),
        })
    }
}

impl fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.model)
    }
}

/// Something that can produce tip texts for a topic
#[async_trait]
pub trait TipGenerator: Send + Sync {
    /// Name for logs and error messages
    fn name(&self) -> String;

    /// Generate up to `count` tip texts about `topic`
    ///
    /// Returns at least one non-empty string on success.
    async fn generate(&self, topic: &str, count: u32) -> Result<Vec<String>, GenerateError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_spec_parses() {
        let spec: ModelSpec = "anthropic/claude-3-5-haiku-latest".parse().unwrap();
        assert_eq!(spec.provider, Provider::Anthropic);
        assert_eq!(spec.model, "claude-3-5-haiku-latest");
        assert_eq!(spec.to_string(), "anthropic/claude-3-5-haiku-latest");
    }

    #[test]
    fn test_model_spec_rejects_bad_format() {
        for bad in ["gpt-4o", "openai/", "/gpt-4o", "openai/gpt/4o", ""] {
            assert!(
                matches!(bad.parse::<ModelSpec>(), Err(GenerateError::InvalidModel(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_unknown_provider_lists_supported() {
        let err = "mistral/large".parse::<ModelSpec>().unwrap_err();
        assert!(matches!(err, GenerateError::UnsupportedProvider(ref p) if p == "mistral"));
        assert!(err.to_string().contains("openai, anthropic, google"));
    }

    #[test]
    fn test_missing_key_names_variable() {
        let err = GenerateError::MissingApiKey {
            var: Provider::Google.api_key_var(),
        };
        assert!(err.to_string().starts_with("GOOGLE_API_KEY environment variable not set"));
    }

    #[test]
    fn test_classify_failure() {
        assert!(matches!(classify_failure(Some(401), "nope"), GenerateError::InvalidApiKey));
        assert!(matches!(
            classify_failure(None, "Incorrect API key provided"),
            GenerateError::InvalidApiKey
        ));
        assert!(matches!(classify_failure(Some(429), "slow down"), GenerateError::RateLimited));
        assert!(matches!(
            classify_failure(Some(400), "You exceeded your current quota"),
            GenerateError::RateLimited
        ));
        assert!(matches!(
            classify_failure(Some(500), "boom"),
            GenerateError::Request(ref m) if m == "HTTP 500: boom"
        ));
    }
}
