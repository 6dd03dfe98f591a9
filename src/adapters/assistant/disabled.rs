//! Assistant used when no provider is configured.

use async_trait::async_trait;

use crate::domain::decision::OptionDetails;
use crate::ports::{
    AssistError, ClarifyDescriptionRequest, DecisionAssistant, OptionIdeasRequest,
    RefineOptionRequest, StageTextRequest,
};

/// Answers every request with [`AssistError::Disabled`] so callers take their
/// fallback path without a network round trip.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAssistant;

#[async_trait]
impl DecisionAssistant for DisabledAssistant {
    async fn classify(&self, _title: &str) -> Result<String, AssistError> {
        Err(AssistError::Disabled)
    }

    async fn suggest_text(&self, _request: &StageTextRequest) -> Result<String, AssistError> {
        Err(AssistError::Disabled)
    }

    async fn suggest_options(
        &self,
        _request: &OptionIdeasRequest,
    ) -> Result<Vec<OptionDetails>, AssistError> {
        Err(AssistError::Disabled)
    }

    async fn refine_option(
        &self,
        _request: &RefineOptionRequest,
    ) -> Result<OptionDetails, AssistError> {
        Err(AssistError::Disabled)
    }

    async fn clarify_description(
        &self,
        _request: &ClarifyDescriptionRequest,
    ) -> Result<String, AssistError> {
        Err(AssistError::Disabled)
    }

    fn name(&self) -> &str {
        "disabled"
    }
}
