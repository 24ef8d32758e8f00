//! Sample tools registered by the toolhost binary.
use rmcp::model::{CallToolResult, Content};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::definition::{ParameterDefinition, ParameterKind, ToolArguments, ToolDefinition};

/// Tools the binary serves when launched directly.
pub fn default_tools() -> Vec<ToolDefinition> {
    vec![echo_tool(), ping_tool()]
}

/// Echo the `message` argument back to the caller.
pub fn echo_tool() -> ToolDefinition {
    ToolDefinition::new(
        "echo_tool",
        "Echoes the input",
        vec![ParameterDefinition::new(
            "message",
            ParameterKind::String,
            "Message to echo",
        )],
        |arguments: ToolArguments, _cancel: CancellationToken| async move {
            let message = arguments
                .get("message")
                .map(display_value)
                .unwrap_or_else(|| "No message".to_string());
            Ok(CallToolResult::success(vec![Content::text(format!(
                "Echo: {message}"
            ))]))
        },
    )
}

/// Liveness probe answering `pong`.
pub fn ping_tool() -> ToolDefinition {
    ToolDefinition::new(
        "ping",
        "Responds with pong to confirm the host is serving",
        vec![],
        |_arguments: ToolArguments, _cancel: CancellationToken| async move {
            Ok(CallToolResult::success(vec![Content::text("pong")]))
        },
    )
}

/// Render an argument value the way a caller typed it: strings without the
/// surrounding JSON quotes, everything else as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
