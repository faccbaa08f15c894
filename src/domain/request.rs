use serde::Serialize;

use super::message::{ChatMessage, Tool};
use super::routing::{Dials, FallbackConfig, ProviderConfig, RouterModelConfig, ToolsConfig};

/// Per-call arguments for a chat completion
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub tools: Option<Vec<Tool>>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            tools: None,
        }
    }

    pub fn builder() -> CompletionRequestBuilder {
        CompletionRequestBuilder::new()
    }
}

/// Builder for CompletionRequest
#[derive(Debug, Default)]
pub struct CompletionRequestBuilder {
    messages: Vec<ChatMessage>,
    tools: Option<Vec<Tool>>,
}

impl CompletionRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn messages(mut self, messages: Vec<ChatMessage>) -> Self {
        self.messages = messages;
        self
    }

    pub fn system(self, content: impl Into<String>) -> Self {
        self.message(ChatMessage::system(content))
    }

    pub fn user(self, content: impl Into<String>) -> Self {
        self.message(ChatMessage::user(content))
    }

    pub fn assistant(self, content: impl Into<String>) -> Self {
        self.message(ChatMessage::assistant(content))
    }

    pub fn tool(mut self, tool: Tool) -> Self {
        self.tools.get_or_insert_with(Vec::new).push(tool);
        self
    }

    pub fn tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn build(self) -> CompletionRequest {
        CompletionRequest {
            messages: self.messages,
            tools: self.tools,
        }
    }
}

/// Assembled request body for `POST /v0/chat/completions`.
///
/// Optional fields left unset are absent from the serialized body — never
/// `null` — because the server treats an omitted field as "use the server
/// default" and an explicit value as an override.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionParams {
    pub messages: Vec<ChatMessage>,
    pub dials: Dials,
    pub provider_config: ProviderConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub router_model_config: Option<RouterModelConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_config: Option<FallbackConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools_config: Option<ToolsConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
}
