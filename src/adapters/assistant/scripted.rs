//! Scripted assistant for tests.
//!
//! Each question has one configured answer that is returned on every call.
//! Calls are recorded for verification.
//!
//! ```ignore
//! let assistant = ScriptedAssistant::new()
//!     .with_category("Career")
//!     .with_stage_text_error(AssistError::Timeout { timeout_secs: 30 });
//! ```

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::domain::decision::OptionDetails;
use crate::domain::stage::StageId;
use crate::ports::{
    AssistError, ClarifyDescriptionRequest, DecisionAssistant, OptionIdeasRequest,
    RefineOptionRequest, StageTextRequest,
};

/// A recorded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedCall {
    Classify(String),
    SuggestText(StageId),
    SuggestOptions(usize),
    RefineOption(String),
    ClarifyDescription(String),
}

/// Assistant with fixed answers.
#[derive(Debug, Clone)]
pub struct ScriptedAssistant {
    category: Result<String, AssistError>,
    stage_text: Result<String, AssistError>,
    options: Result<Vec<OptionDetails>, AssistError>,
    refinement: Result<OptionDetails, AssistError>,
    rewrite: Result<String, AssistError>,
    calls: Arc<Mutex<Vec<ScriptedCall>>>,
}

impl ScriptedAssistant {
    /// Every question fails with `Unavailable` until scripted.
    pub fn new() -> Self {
        let unscripted = || AssistError::Unavailable("not scripted".to_string());
        Self {
            category: Err(unscripted()),
            stage_text: Err(unscripted()),
            options: Err(unscripted()),
            refinement: Err(unscripted()),
            rewrite: Err(unscripted()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Ok(category.into());
        self
    }

    pub fn with_category_error(mut self, error: AssistError) -> Self {
        self.category = Err(error);
        self
    }

    pub fn with_stage_text(mut self, text: impl Into<String>) -> Self {
        self.stage_text = Ok(text.into());
        self
    }

    pub fn with_stage_text_error(mut self, error: AssistError) -> Self {
        self.stage_text = Err(error);
        self
    }

    pub fn with_options(mut self, options: Vec<OptionDetails>) -> Self {
        self.options = Ok(options);
        self
    }

    pub fn with_options_error(mut self, error: AssistError) -> Self {
        self.options = Err(error);
        self
    }

    pub fn with_refinement(mut self, details: OptionDetails) -> Self {
        self.refinement = Ok(details);
        self
    }

    pub fn with_refinement_error(mut self, error: AssistError) -> Self {
        self.refinement = Err(error);
        self
    }

    pub fn with_rewrite(mut self, html: impl Into<String>) -> Self {
        self.rewrite = Ok(html.into());
        self
    }

    pub fn with_rewrite_error(mut self, error: AssistError) -> Self {
        self.rewrite = Err(error);
        self
    }

    /// Requests received so far, oldest first.
    pub fn calls(&self) -> Vec<ScriptedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn record(&self, call: ScriptedCall) {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);
    }
}

impl Default for ScriptedAssistant {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DecisionAssistant for ScriptedAssistant {
    async fn classify(&self, title: &str) -> Result<String, AssistError> {
        self.record(ScriptedCall::Classify(title.to_string()));
        self.category.clone()
    }

    async fn suggest_text(&self, request: &StageTextRequest) -> Result<String, AssistError> {
        self.record(ScriptedCall::SuggestText(request.stage));
        self.stage_text.clone()
    }

    async fn suggest_options(
        &self,
        request: &OptionIdeasRequest,
    ) -> Result<Vec<OptionDetails>, AssistError> {
        self.record(ScriptedCall::SuggestOptions(request.count));
        self.options.clone()
    }

    async fn refine_option(
        &self,
        request: &RefineOptionRequest,
    ) -> Result<OptionDetails, AssistError> {
        self.record(ScriptedCall::RefineOption(request.option_title.clone()));
        self.refinement.clone()
    }

    async fn clarify_description(
        &self,
        request: &ClarifyDescriptionRequest,
    ) -> Result<String, AssistError> {
        self.record(ScriptedCall::ClarifyDescription(request.title.clone()));
        self.rewrite.clone()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unscripted_questions_fail() {
        let assistant = ScriptedAssistant::new();
        assert!(matches!(
            assistant.classify("Which car?").await,
            Err(AssistError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn scripted_answers_are_returned_and_recorded() {
        let assistant = ScriptedAssistant::new().with_category("Shopping");
        assert_eq!(assistant.classify("Which car?").await.unwrap(), "Shopping");
        assert_eq!(
            assistant.calls(),
            vec![ScriptedCall::Classify("Which car?".to_string())]
        );
    }

    #[tokio::test]
    async fn clones_share_call_history() {
        let assistant = ScriptedAssistant::new().with_stage_text("<p>Draft</p>");
        let handle = assistant.clone();
        let request = StageTextRequest {
            decision_title: "t".to_string(),
            decision_description: None,
            stage: StageId::Review,
            current_content: String::new(),
        };
        handle.suggest_text(&request).await.unwrap();
        assert_eq!(assistant.calls(), vec![ScriptedCall::SuggestText(StageId::Review)]);
    }
}
