//! Decision assistant adapters.
//!
//! - `ChatCompletionsAssistant` - OpenAI-compatible API (OpenAI, Grok, Groq)
//! - `DisabledAssistant` - no provider configured
//! - `ScriptedAssistant` - fixed answers for tests

mod chat_completions;
mod disabled;
mod scripted;

pub use chat_completions::{ChatCompletionsAssistant, ChatCompletionsConfig};
pub use disabled::DisabledAssistant;
pub use scripted::{ScriptedAssistant, ScriptedCall};

use std::sync::Arc;

use crate::config::AssistantConfig;
use crate::ports::{AssistError, DecisionAssistant};

/// Builds the assistant selected by configuration.
///
/// A disabled provider yields [`DisabledAssistant`]. Other providers need an
/// API key; the endpoint and model come from the provider preset unless
/// overridden.
pub fn assistant_from_config(
    config: &AssistantConfig,
) -> Result<Arc<dyn DecisionAssistant>, AssistError> {
    if !config.is_enabled() {
        tracing::info!("assistant disabled");
        return Ok(Arc::new(DisabledAssistant));
    }

    let api_key = config.api_key.clone().ok_or_else(|| {
        AssistError::Unavailable(format!("no API key for {}", config.provider.as_str()))
    })?;

    let mut chat = ChatCompletionsConfig::new(config.provider.as_str(), api_key)
        .with_timeout(config.timeout());
    if let Some(url) = config.resolved_base_url() {
        chat = chat.with_base_url(url);
    }
    if let Some(model) = config.resolved_model() {
        chat = chat.with_model(model);
    }

    tracing::info!(
        provider = config.provider.as_str(),
        model = %chat.model,
        "assistant configured"
    );
    Ok(Arc::new(ChatCompletionsAssistant::new(chat)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssistantProvider;
    use secrecy::Secret;

    #[test]
    fn disabled_config_builds_disabled_assistant() {
        let assistant = assistant_from_config(&AssistantConfig::default()).unwrap();
        assert_eq!(assistant.name(), "disabled");
    }

    #[test]
    fn enabled_config_builds_chat_assistant_named_after_provider() {
        let config = AssistantConfig {
            provider: AssistantProvider::Grok,
            api_key: Some(Secret::new("xai-key".to_string())),
            ..Default::default()
        };
        let assistant = assistant_from_config(&config).unwrap();
        assert_eq!(assistant.name(), "grok");
    }

    #[test]
    fn missing_key_is_reported() {
        let config = AssistantConfig {
            provider: AssistantProvider::OpenAi,
            ..Default::default()
        };
        assert!(matches!(
            assistant_from_config(&config),
            Err(AssistError::Unavailable(_))
        ));
    }
}
