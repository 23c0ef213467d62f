//! Tool trait — the abstraction over callable fleet operations.
//!
//! Tools are the structured operations the model can request against the
//! backing store: listing mowers, creating work orders, etc. They are
//! registered in the `ToolRegistry`, whose definitions are handed to the
//! model verbatim.

use crate::error::ToolError;
use crate::provider::ToolDefinition;
use async_trait::async_trait;
use std::collections::HashMap;

/// A request to execute a tool.
#[derive(Debug, Clone)]
pub struct ToolCall {
    /// Unique call ID (matches the model's tool_call id)
    pub id: String,

    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON value
    pub arguments: serde_json::Value,
}

/// The result of a tool execution, serialized back to the model as JSON.
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// The call ID this result is for
    pub call_id: String,

    /// The JSON payload handed back to the model
    pub payload: serde_json::Value,
}

/// The core Tool trait.
///
/// Each fleet operation implements this trait. Argument payloads are decoded
/// into the tool's own typed args struct at the dispatch boundary.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g. "list_mowers").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the model).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments.
    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<serde_json::Value, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the model.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of available tools.
///
/// The orchestration loop uses this to:
/// 1. Get tool definitions to send to the model
/// 2. Dispatch tool calls by name when the model requests them
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Get all tool definitions (for sending to the model).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    /// Execute a tool call, never aborting the turn.
    ///
    /// Unknown names and execution failures come back as `{"error": ...}`
    /// payloads so the model can recover or apologize.
    pub async fn dispatch(&self, call: &ToolCall) -> ToolResult {
        let payload = match self.tools.get(&call.name) {
            None => error_payload(&ToolError::Unknown(call.name.clone())),
            Some(tool) => match tool.execute(call.arguments.clone()).await {
                Ok(value) => value,
                Err(e) => error_payload(&e),
            },
        };
        ToolResult {
            call_id: call.id.clone(),
            payload,
        }
    }

    /// List all registered tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }
}

fn error_payload(err: &ToolError) -> serde_json::Value {
    serde_json::json!({ "error": err.to_string() })
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple test tool for unit tests.
    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes back the input"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" }
                },
                "required": ["text"]
            })
        }
        async fn execute(
            &self,
            arguments: serde_json::Value,
        ) -> std::result::Result<serde_json::Value, ToolError> {
            let text = arguments["text"].as_str().unwrap_or("").to_string();
            Ok(serde_json::json!({ "echo": text }))
        }
    }

    #[test]
    fn registry_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        assert!(registry.get("echo").is_some());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn registry_definitions() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        let defs = registry.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "echo");
    }

    #[tokio::test]
    async fn registry_dispatch_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));

        let call = ToolCall {
            id: "call_1".into(),
            name: "echo".into(),
            arguments: serde_json::json!({"text": "hello fleet"}),
        };
        let result = registry.dispatch(&call).await;
        assert_eq!(result.call_id, "call_1");
        assert_eq!(result.payload["echo"], "hello fleet");
    }

    #[tokio::test]
    async fn registry_dispatch_unknown_tool() {
        let registry = ToolRegistry::new();
        let call = ToolCall {
            id: "call_1".into(),
            name: "nonexistent".into(),
            arguments: serde_json::json!({}),
        };
        let result = registry.dispatch(&call).await;
        assert_eq!(result.payload["error"], "Unknown tool: nonexistent");
    }
}
