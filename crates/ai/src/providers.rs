//! Generation provider selection and rig-core client factories.

use reqwest::Client as HttpClient;
use rig::{
    client::Nothing,
    providers::{anthropic, gemini, groq, ollama, openai, openrouter},
};
use serde::{Deserialize, Serialize};

use crate::error::CheckInError;

/// Provider ids understood by [`ProviderSettings`]. Anything else is treated
/// as OpenAI-compatible.
pub const KNOWN_PROVIDERS: [&str; 7] = [
    "anthropic",
    "openai",
    "gemini",
    "google",
    "groq",
    "ollama",
    "openrouter",
];

/// Which provider and model generate check-ins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettings {
    pub provider_id: String,
    pub model_id: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Base URL override (Ollama).
    #[serde(default)]
    pub base_url: Option<String>,
    /// Upper bound on generated tokens.
    pub max_tokens: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            provider_id: "anthropic".to_string(),
            model_id: default_model("anthropic").to_string(),
            api_key: None,
            base_url: None,
            max_tokens: 4096,
        }
    }
}

impl ProviderSettings {
    pub fn new(provider_id: &str, model_id: Option<&str>) -> Self {
        let provider_id = provider_id.trim().to_lowercase();
        let model_id = model_id
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_model(&provider_id).to_string());
        Self {
            provider_id,
            model_id,
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url.filter(|u| !u.trim().is_empty());
        self
    }

    pub fn is_known_provider(&self) -> bool {
        KNOWN_PROVIDERS.contains(&self.provider_id.as_str())
    }

    /// Whether generation can be attempted at all. Ollama needs no key.
    pub fn is_configured(&self) -> bool {
        self.provider_id == "ollama" || self.api_key.is_some()
    }
}

/// Default model per provider.
pub fn default_model(provider_id: &str) -> &'static str {
    match provider_id {
        "anthropic" => "claude-sonnet-4-5",
        "gemini" | "google" => "gemini-2.5-flash",
        "groq" => "llama-3.3-70b-versatile",
        "ollama" => "llama3.1",
        "openrouter" => "openai/gpt-4o-mini",
        _ => "gpt-4o-mini",
    }
}

// ============================================================================
// Provider Client Factories
// ============================================================================

pub(crate) fn create_anthropic_client(
    api_key: Option<String>,
    provider_id: &str,
) -> Result<anthropic::Client<HttpClient>, CheckInError> {
    let key = api_key.ok_or_else(|| CheckInError::MissingApiKey(provider_id.to_string()))?;
    anthropic::Client::new(&key).map_err(|e| CheckInError::Provider(e.to_string()))
}

pub(crate) fn create_gemini_client(
    api_key: Option<String>,
    provider_id: &str,
) -> Result<gemini::Client<HttpClient>, CheckInError> {
    let key = api_key.ok_or_else(|| CheckInError::MissingApiKey(provider_id.to_string()))?;
    gemini::Client::new(&key).map_err(|e| CheckInError::Provider(e.to_string()))
}

pub(crate) fn create_groq_client(
    api_key: Option<String>,
    provider_id: &str,
) -> Result<groq::Client<HttpClient>, CheckInError> {
    let key = api_key.ok_or_else(|| CheckInError::MissingApiKey(provider_id.to_string()))?;
    groq::Client::new(&key).map_err(|e| CheckInError::Provider(e.to_string()))
}

/// OpenAI client on the Completions API.
pub(crate) fn create_openai_client(
    api_key: Option<String>,
    provider_id: &str,
) -> Result<openai::CompletionsClient<HttpClient>, CheckInError> {
    let key = api_key.ok_or_else(|| CheckInError::MissingApiKey(provider_id.to_string()))?;
    openai::CompletionsClient::builder()
        .api_key(&key)
        .build()
        .map_err(|e| CheckInError::Provider(e.to_string()))
}

pub(crate) fn create_openrouter_client(
    api_key: Option<String>,
    provider_id: &str,
) -> Result<openrouter::Client<HttpClient>, CheckInError> {
    let key = api_key.ok_or_else(|| CheckInError::MissingApiKey(provider_id.to_string()))?;
    openrouter::Client::new(&key).map_err(|e| CheckInError::Provider(e.to_string()))
}

pub(crate) fn create_ollama_client(
    base_url: Option<String>,
) -> Result<ollama::Client<HttpClient>, CheckInError> {
    let mut builder = ollama::Client::builder().api_key(Nothing);
    if let Some(url) = base_url {
        builder = builder.base_url(&url);
    }
    builder
        .build()
        .map_err(|e| CheckInError::Provider(e.to_string()))
}
