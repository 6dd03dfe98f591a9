//! OpenAI-compatible chat-completions assistant.
//!
//! OpenAI, xAI Grok and Groq all expose the same `/chat/completions`
//! endpoint, so one adapter serves every configured provider.
//!
//! ```ignore
//! let config = ChatCompletionsConfig::new("groq", api_key)
//!     .with_base_url("https://api.groq.com/openai/v1")
//!     .with_model("llama-3.3-70b-versatile");
//!
//! let assistant = ChatCompletionsAssistant::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::decision::OptionDetails;
use crate::domain::stage::catalog;
use crate::ports::{
    AssistError, ClarifyDescriptionRequest, DecisionAssistant, OptionIdeasRequest,
    RefineOptionRequest, StageTextRequest,
};

/// Connection settings for one chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct ChatCompletionsConfig {
    /// Provider name used in logs (e.g., "openai", "groq").
    pub provider: String,
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl ChatCompletionsConfig {
    /// OpenAI defaults; override endpoint and model for other providers.
    pub fn new(provider: impl Into<String>, api_key: Secret<String>) -> Self {
        Self {
            provider: provider.into(),
            api_key,
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Assistant backed by an OpenAI-compatible API.
pub struct ChatCompletionsAssistant {
    config: ChatCompletionsConfig,
    client: Client,
}

impl ChatCompletionsAssistant {
    /// Builds the HTTP client.
    ///
    /// # Errors
    ///
    /// - `Unavailable` if the TLS backend cannot be initialised
    pub fn new(config: ChatCompletionsConfig) -> Result<Self, AssistError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AssistError::Unavailable(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Sends one user prompt and returns the first choice's content.
    async fn complete(&self, prompt: String, json_mode: bool) -> Result<String, AssistError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            response_format: json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AssistError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    AssistError::Network(format!("Connection failed: {}", e))
                } else {
                    AssistError::Network(e.to_string())
                }
            })?;

        let response = handle_response_status(response).await?;
        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AssistError::InvalidResponse(format!("Failed to parse body: {}", e)))?;

        first_content(body)
    }
}

#[async_trait]
impl DecisionAssistant for ChatCompletionsAssistant {
    async fn classify(&self, title: &str) -> Result<String, AssistError> {
        let content = self.complete(classify_prompt(title), false).await?;
        let category = content.trim().trim_matches('"').trim();
        if category.is_empty() {
            return Err(AssistError::InvalidResponse("empty category".to_string()));
        }
        Ok(category.to_string())
    }

    async fn suggest_text(&self, request: &StageTextRequest) -> Result<String, AssistError> {
        let content = self.complete(stage_text_prompt(request), false).await?;
        let text = content.trim();
        if text.is_empty() {
            return Err(AssistError::InvalidResponse("empty stage text".to_string()));
        }
        Ok(text.to_string())
    }

    async fn suggest_options(
        &self,
        request: &OptionIdeasRequest,
    ) -> Result<Vec<OptionDetails>, AssistError> {
        let content = self.complete(option_ideas_prompt(request), true).await?;
        parse_option_ideas(&content, request.count)
    }

    async fn refine_option(
        &self,
        request: &RefineOptionRequest,
    ) -> Result<OptionDetails, AssistError> {
        let content = self.complete(refine_prompt(request), true).await?;
        parse_refinement(&content, &request.option_title)
    }

    async fn clarify_description(
        &self,
        request: &ClarifyDescriptionRequest,
    ) -> Result<String, AssistError> {
        let content = self.complete(clarify_prompt(request), true).await?;
        parse_clarification(&content)
    }

    fn name(&self) -> &str {
        &self.config.provider
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Prompts
// ════════════════════════════════════════════════════════════════════════════

fn classify_prompt(title: &str) -> String {
    format!(
        "Categorize the following decision into a single short category (1-3 words).\n\
         Examples: Career, Personal Finance, Health, Education, Travel, Shopping, Technology.\n\n\
         Decision Title: {}\n\n\
         Return ONLY the category name. No JSON, no preamble, no explanation.",
        title
    )
}

fn stage_text_prompt(request: &StageTextRequest) -> String {
    let details = catalog::metadata_of(request.stage);
    let guidance = details
        .bullets
        .iter()
        .map(|b| format!("- {}", b))
        .collect::<Vec<_>>()
        .join("\n");
    let current = if request.current_content.trim().is_empty() {
        "(empty)"
    } else {
        request.current_content.as_str()
    };

    format!(
        "As an expert decision-making assistant, draft the \"{}\" stage for the decision below.\n\
         The stage asks: {}\n\
         Cover:\n{}\n\
         Watch out for: {}\n\n\
         Decision Title: {}\n\
         Decision Description: {}\n\
         Current notes for this stage: {}\n\n\
         Respond with the stage text only, as simple HTML paragraphs.",
        details.label,
        details.quote,
        guidance,
        details.risk,
        request.decision_title,
        request.decision_description.as_deref().unwrap_or(""),
        current
    )
}

fn option_ideas_prompt(request: &OptionIdeasRequest) -> String {
    format!(
        "As an expert decision-making assistant, provide {} creative and distinct alternative options for the following decision.\n\
         Base your suggestions heavily on both the title and the detailed description provided to ensure they are highly relevant.\n\n\
         Decision Title: {}\n\
         Decision Description: {}\n\n\
         IMPORTANT: You must respond ONLY with a JSON object in the following format:\n\
         {{\"suggestions\": [{{\"title\": \"string\", \"description\": \"string\", \"pros\": \"string\", \"cons\": \"string\"}}]}}",
        request.count,
        request.decision_title,
        request.decision_description.as_deref().unwrap_or("")
    )
}

fn refine_prompt(request: &RefineOptionRequest) -> String {
    format!(
        "As an expert decision-making assistant, help me flesh out an option for the following decision.\n\n\
         Decision Title: {}\n\
         Decision Description: {}\n\n\
         Option Title: {}\n\n\
         Please provide a detailed description, pros, and cons for this specific option, considering the context of the decision.\n\n\
         IMPORTANT: You must respond ONLY with a JSON object in the following format:\n\
         {{\"description\": \"string\", \"pros\": \"string\", \"cons\": \"string\"}}",
        request.decision_title,
        request.decision_description.as_deref().unwrap_or(""),
        request.option_title
    )
}

fn clarify_prompt(request: &ClarifyDescriptionRequest) -> String {
    format!(
        "As an expert decision-making consultant, help me clarify and improve the description of a decision I'm trying to make.\n\n\
         Current Title: {}\n\
         Current Description: {}\n\n\
         Please rewrite the description to be more clear, professional, and actionable.\n\
         Keep the core intent but improve the structure and wording.\n\
         If the current description is very short, expand on what might be important to consider.\n\n\
         IMPORTANT: You must respond ONLY with a JSON object in the following format:\n\
         {{\"clarified_description\": \"string (can contain basic HTML like <p>, <ul>, <li>, <strong>, <em>)\"}}",
        request.title, request.description
    )
}

// ════════════════════════════════════════════════════════════════════════════
// Response handling
// ════════════════════════════════════════════════════════════════════════════

async fn handle_response_status(response: Response) -> Result<Response, AssistError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_body = response.text().await.unwrap_or_default();
    match status.as_u16() {
        401 | 403 => Err(AssistError::Unavailable("authentication failed".to_string())),
        429 => Err(AssistError::Unavailable("rate limited".to_string())),
        500..=599 => Err(AssistError::Unavailable(format!(
            "Server error {}: {}",
            status, error_body
        ))),
        _ => Err(AssistError::InvalidResponse(format!(
            "Unexpected status {}: {}",
            status, error_body
        ))),
    }
}

fn first_content(body: ChatResponse) -> Result<String, AssistError> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| AssistError::InvalidResponse("no choices in response".to_string()))
}

/// Accepts `{"suggestions": [...]}` or a bare array. Ideas without a usable
/// title are dropped.
fn parse_option_ideas(content: &str, limit: usize) -> Result<Vec<OptionDetails>, AssistError> {
    let value: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| AssistError::InvalidResponse(format!("not JSON: {}", e)))?;

    let list = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("suggestions") {
            Some(serde_json::Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    let ideas: Vec<OptionDetails> = list
        .into_iter()
        .filter_map(|item| serde_json::from_value::<RawIdea>(item).ok())
        .filter_map(|raw| OptionDetails::new(raw.title, raw.description, raw.pros, raw.cons).ok())
        .take(limit)
        .collect();

    if ideas.is_empty() {
        return Err(AssistError::InvalidResponse(
            "no usable suggestions".to_string(),
        ));
    }
    Ok(ideas)
}

/// Reads `{"description", "pros", "cons"}`. The title is the one the owner
/// asked about, not whatever the provider echoes back.
fn parse_refinement(content: &str, option_title: &str) -> Result<OptionDetails, AssistError> {
    let raw: RawIdea = serde_json::from_str(content)
        .map_err(|e| AssistError::InvalidResponse(format!("not JSON: {}", e)))?;

    if raw.description.trim().is_empty() && raw.pros.trim().is_empty() && raw.cons.trim().is_empty()
    {
        return Err(AssistError::InvalidResponse("empty refinement".to_string()));
    }
    OptionDetails::new(option_title, raw.description, raw.pros, raw.cons)
        .map_err(|e| AssistError::InvalidResponse(e.to_string()))
}

fn parse_clarification(content: &str) -> Result<String, AssistError> {
    let raw: RawClarification = serde_json::from_str(content)
        .map_err(|e| AssistError::InvalidResponse(format!("not JSON: {}", e)))?;

    let html = raw.clarified_description.trim();
    if html.is_empty() {
        return Err(AssistError::InvalidResponse(
            "empty clarified_description".to_string(),
        ));
    }
    Ok(html.to_string())
}

// ════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawIdea {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    pros: String,
    #[serde(default)]
    cons: String,
}

#[derive(Debug, Deserialize)]
struct RawClarification {
    #[serde(default)]
    clarified_description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stage::StageId;

    fn config() -> ChatCompletionsConfig {
        ChatCompletionsConfig::new("groq", Secret::new("test-key".to_string()))
    }

    #[test]
    fn config_builder_works() {
        let config = config()
            .with_model("llama-3.3-70b-versatile")
            .with_base_url("https://api.groq.com/openai/v1/")
            .with_timeout(Duration::from_secs(10));

        assert_eq!(config.model, "llama-3.3-70b-versatile");
        assert_eq!(config.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn completions_url_appends_path() {
        let assistant =
            ChatCompletionsAssistant::new(config().with_base_url("https://api.x.ai/v1")).unwrap();
        assert_eq!(assistant.completions_url(), "https://api.x.ai/v1/chat/completions");
        assert_eq!(assistant.name(), "groq");
    }

    #[test]
    fn json_mode_serializes_response_format() {
        let request = ChatRequest {
            model: "gpt-3.5-turbo",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi".to_string(),
            }],
            response_format: Some(ResponseFormat {
                kind: "json_object",
            }),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn plain_mode_omits_response_format() {
        let request = ChatRequest {
            model: "gpt-3.5-turbo",
            messages: Vec::new(),
            response_format: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("response_format").is_none());
    }

    #[test]
    fn first_content_reads_first_choice() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Career"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_content(body).unwrap(), "Career");
    }

    #[test]
    fn first_content_rejects_empty_choices() {
        let body: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            first_content(body),
            Err(AssistError::InvalidResponse(_))
        ));
    }

    #[test]
    fn option_ideas_parse_nested_list() {
        let content = r#"{"suggestions":[
            {"title":"Rent first","description":"Try the area","pros":"Flexible","cons":"No equity"},
            {"title":"Buy now","description":"","pros":"Equity","cons":"Debt"}
        ]}"#;
        let ideas = parse_option_ideas(content, 3).unwrap();
        assert_eq!(ideas.len(), 2);
        assert_eq!(ideas[0].title, "Rent first");
        assert_eq!(ideas[1].cons, "Debt");
    }

    #[test]
    fn option_ideas_accept_bare_array_and_truncate() {
        let content = r#"[{"title":"A"},{"title":"B"},{"title":"C"},{"title":"D"}]"#;
        let ideas = parse_option_ideas(content, 3).unwrap();
        assert_eq!(ideas.len(), 3);
        assert_eq!(ideas[2].title, "C");
    }

    #[test]
    fn option_ideas_drop_untitled_entries() {
        let content = r#"{"suggestions":[{"title":"  "},{"description":"no title"}]}"#;
        assert!(matches!(
            parse_option_ideas(content, 3),
            Err(AssistError::InvalidResponse(_))
        ));
    }

    #[test]
    fn option_ideas_reject_non_json() {
        assert!(parse_option_ideas("Here are some ideas", 3).is_err());
    }

    #[test]
    fn stage_prompt_includes_catalog_guidance() {
        let request = StageTextRequest {
            decision_title: "Switch jobs?".to_string(),
            decision_description: None,
            stage: StageId::Objectives,
            current_content: String::new(),
        };
        let prompt = stage_text_prompt(&request);
        assert!(prompt.contains("3. Objective & Constraint Definition"));
        assert!(prompt.contains("hidden constraints sabotage later stages"));
        assert!(prompt.contains("Switch jobs?"));
        assert!(prompt.contains("(empty)"));
    }

    #[test]
    fn classify_prompt_embeds_title() {
        let prompt = classify_prompt("Buy a new laptop");
        assert!(prompt.contains("Decision Title: Buy a new laptop"));
        assert!(prompt.contains("Return ONLY the category name"));
    }

    #[test]
    fn refinement_keeps_requested_title() {
        let content = r#"{"title":"Something else","description":"Two year lease","pros":"Low upfront","cons":"Mileage cap"}"#;
        let details = parse_refinement(content, "Lease").unwrap();
        assert_eq!(details.title, "Lease");
        assert_eq!(details.description, "Two year lease");
        assert_eq!(details.pros, "Low upfront");
        assert_eq!(details.cons, "Mileage cap");
    }

    #[test]
    fn refinement_rejects_empty_or_malformed_answers() {
        assert!(matches!(
            parse_refinement("{}", "Lease"),
            Err(AssistError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_refinement("Sure! Leasing is great.", "Lease"),
            Err(AssistError::InvalidResponse(_))
        ));
    }

    #[test]
    fn clarification_reads_html_field() {
        let content = r#"{"clarified_description":" <p>Pick a car under budget.</p> "}"#;
        assert_eq!(
            parse_clarification(content).unwrap(),
            "<p>Pick a car under budget.</p>"
        );
    }

    #[test]
    fn clarification_rejects_missing_field() {
        assert!(matches!(
            parse_clarification(r#"{"description":"wrong key"}"#),
            Err(AssistError::InvalidResponse(_))
        ));
    }

    #[test]
    fn refine_and_clarify_prompts_embed_context() {
        let refine = refine_prompt(&RefineOptionRequest {
            decision_title: "Which car?".to_string(),
            decision_description: Some("Commuting 40km".to_string()),
            option_title: "Lease".to_string(),
        });
        assert!(refine.contains("Decision Title: Which car?"));
        assert!(refine.contains("Decision Description: Commuting 40km"));
        assert!(refine.contains("Option Title: Lease"));
        assert!(refine.contains(r#"{"description": "string", "pros": "string", "cons": "string"}"#));

        let clarify = clarify_prompt(&ClarifyDescriptionRequest {
            title: "Which car?".to_string(),
            description: "need car".to_string(),
        });
        assert!(clarify.contains("Current Title: Which car?"));
        assert!(clarify.contains("Current Description: need car"));
        assert!(clarify.contains("clarified_description"));
    }
}
