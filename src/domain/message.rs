use serde::{Deserialize, Serialize};

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Assistant,
    User,
    System,
    Tool,
}

/// Function invocation requested by the model.
///
/// `arguments` is itself JSON-encoded; callers parse it before executing
/// the tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallFunction {
    pub name: String,
    pub arguments: String,
}

/// A tool invocation produced by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: String,
    pub function: ToolCallFunction,
}

/// Caller-declared tool the model may invoke
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Free-form function descriptor: name, description and JSON schema
    /// parameters, forwarded to the server verbatim
    pub function: serde_json::Value,
}

impl Tool {
    pub fn function(descriptor: serde_json::Value) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: descriptor,
        }
    }
}

/// A message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// Build the message that echoes a tool result back to the server,
    /// correlated to the originating [`ToolCall`] by id.
    pub fn tool(
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
            name: Some(name.into()),
        }
    }

    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = ChatMessage::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello");
        assert!(msg.tool_calls.is_none());
    }

    #[test]
    fn test_message_serialization_omits_unset_fields() {
        let msg = ChatMessage::assistant("Hi there!");
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "Hi there!");
        assert!(json.get("tool_calls").is_none());
        assert!(json.get("tool_call_id").is_none());
        assert!(json.get("name").is_none());
    }

    #[test]
    fn test_tool_message_carries_correlation_id() {
        let msg = ChatMessage::tool("call_123", "get_current_weather", "{\"temp\":72}");
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["role"], "tool");
        assert_eq!(json["tool_call_id"], "call_123");
        assert_eq!(json["name"], "get_current_weather");
    }

    #[test]
    fn test_tool_call_deserialization() {
        let json = serde_json::json!({
            "id": "call_abc",
            "type": "function",
            "function": {
                "name": "get_current_weather",
                "arguments": "{\"location\":\"Tokyo\"}"
            }
        });

        let call: ToolCall = serde_json::from_value(json).unwrap();
        assert_eq!(call.id, "call_abc");
        assert_eq!(call.call_type, "function");
        assert_eq!(call.function.name, "get_current_weather");
    }
}
