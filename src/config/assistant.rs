//! Assistant (text-completion provider) configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Which provider family answers assistant requests.
///
/// All three speak the OpenAI chat-completions protocol and differ only in
/// endpoint and default model.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssistantProvider {
    /// No provider; every request falls back.
    #[default]
    Disabled,
    #[serde(alias = "open_ai")]
    OpenAi,
    Grok,
    Groq,
}

impl AssistantProvider {
    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            AssistantProvider::Disabled => None,
            AssistantProvider::OpenAi => Some("https://api.openai.com/v1"),
            AssistantProvider::Grok => Some("https://api.x.ai/v1"),
            AssistantProvider::Groq => Some("https://api.groq.com/openai/v1"),
        }
    }

    pub fn default_model(&self) -> Option<&'static str> {
        match self {
            AssistantProvider::Disabled => None,
            AssistantProvider::OpenAi => Some("gpt-3.5-turbo"),
            AssistantProvider::Grok => Some("grok-2-1212"),
            AssistantProvider::Groq => Some("llama-3.3-70b-versatile"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssistantProvider::Disabled => "disabled",
            AssistantProvider::OpenAi => "openai",
            AssistantProvider::Grok => "grok",
            AssistantProvider::Groq => "groq",
        }
    }
}

/// Assistant configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    #[serde(default)]
    pub provider: AssistantProvider,

    /// API key for the provider
    pub api_key: Option<Secret<String>>,

    /// Overrides the provider's default endpoint
    pub base_url: Option<String>,

    /// Overrides the provider's default model
    pub model: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl AssistantConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Endpoint after applying the override.
    pub fn resolved_base_url(&self) -> Option<String> {
        self.base_url
            .clone()
            .or_else(|| self.provider.default_base_url().map(str::to_string))
    }

    /// Model after applying the override.
    pub fn resolved_model(&self) -> Option<String> {
        self.model
            .clone()
            .or_else(|| self.provider.default_model().map(str::to_string))
    }

    pub fn is_enabled(&self) -> bool {
        self.provider != AssistantProvider::Disabled
    }

    /// Validate assistant configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidAssistantTimeout);
        }
        if !self.is_enabled() {
            return Ok(());
        }
        if self.api_key.is_none() {
            return Err(ValidationError::MissingRequired("ASSISTANT__API_KEY"));
        }
        if let Some(url) = &self.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidAssistantUrl);
            }
        }
        Ok(())
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            provider: AssistantProvider::default(),
            api_key: None,
            base_url: None,
            model: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
