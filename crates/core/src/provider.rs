//! Provider trait — the abstraction over hosted language models.
//!
//! A Provider knows how to send a conversation (with the tool registry's
//! definitions) to a model and get a response back, and how to perform a
//! single-shot translation. The orchestrator calls `complete()` and
//! `translate()` without knowing which backend is being used.

use crate::error::ProviderError;
use crate::message::Message;
use crate::session::Language;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A completion request sent to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model/deployment to use (e.g. "gpt-4.1-mini")
    pub model: String,

    /// The accumulated message history for this turn
    pub messages: Vec<Message>,

    /// Tools the model may call; handed over verbatim from the registry
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

/// A tool definition sent to the model so it knows what it can call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The generated assistant message; `tool_calls` non-empty when the
    /// model requests tool invocations instead of answering directly.
    pub message: Message,

    /// Token usage statistics, when the backend reports them
    pub usage: Option<Usage>,

    /// Which model actually responded
    pub model: String,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// Failures (timeout, quota, malformed response) are external errors the
/// orchestrator propagates to the caller of the turn — no retry here.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g. "openai", "azure").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError>;

    /// Translate `text` into `target`. Single-shot, stateless.
    ///
    /// Default implementation reuses `complete()` with a fixed translation
    /// instruction, which is how the hosted deployment is shared between
    /// chat and translation.
    async fn translate(
        &self,
        model: &str,
        text: &str,
        target: Language,
    ) -> std::result::Result<String, ProviderError> {
        let target_name = match target {
            Language::En => "English",
            Language::De => "German",
        };
        let request = ProviderRequest {
            model: model.to_string(),
            messages: vec![
                Message::system(format!(
                    "Translate the text to {target_name}. Output only the translation."
                )),
                Message::user(text),
            ],
            tools: Vec::new(),
        };
        let response = self.complete(request).await?;
        Ok(response.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_definition_serialization() {
        let tool = ToolDefinition {
            name: "list_mowers".into(),
            description: "List mowers from the fleet database".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "status": { "type": "string", "description": "Optional status filter" }
                },
                "required": []
            }),
        };
        let json = serde_json::to_string(&tool).unwrap();
        assert!(json.contains("list_mowers"));
        assert!(json.contains("status"));
    }

    #[test]
    fn request_skips_empty_tools() {
        let req = ProviderRequest {
            model: "gpt-4.1-mini".into(),
            messages: vec![Message::user("hi")],
            tools: vec![],
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("\"tools\""));
    }
}
