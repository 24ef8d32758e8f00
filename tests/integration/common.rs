use std::time::Duration;

use rmcp::model::{CallToolResult, Content};
use tokio_util::sync::CancellationToken;
use toolhost_mcp::{
    lib::errors::HandlerError,
    tools::{
        InitializationData, ParameterDefinition, ParameterKind, ToolArguments, ToolDefinition,
    },
};

/// Startup configuration mirrored across the integration suites.
pub fn test_init_data(port: u16) -> InitializationData {
    InitializationData::new(
        "TestServer",
        "1.0.0",
        port,
        vec![test_tool(), echo_tool()],
    )
}

pub fn test_tool() -> ToolDefinition {
    ToolDefinition::new(
        "test_tool",
        "A test tool",
        vec![
            ParameterDefinition::new("param1", ParameterKind::String, "First parameter"),
            ParameterDefinition::new("param2", ParameterKind::Number, "Second parameter"),
        ],
        |_arguments: ToolArguments, cancel: CancellationToken| async move {
            simulated_work(Duration::from_millis(10), &cancel).await?;
            Ok(CallToolResult::success(vec![Content::text(
                "Test response",
            )]))
        },
    )
}

pub fn echo_tool() -> ToolDefinition {
    ToolDefinition::new(
        "echo_tool",
        "Echoes the input",
        vec![ParameterDefinition::new(
            "message",
            ParameterKind::String,
            "Message to echo",
        )],
        |arguments: ToolArguments, cancel: CancellationToken| async move {
            simulated_work(Duration::from_millis(10), &cancel).await?;
            let message = arguments
                .get("message")
                .map(|value| match value {
                    serde_json::Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_else(|| "No message".to_string());
            Ok(CallToolResult::success(vec![Content::text(format!(
                "Echo: {message}"
            ))]))
        },
    )
}

/// Sleep that honours the invocation token the way a real handler must.
pub async fn simulated_work(
    duration: Duration,
    cancel: &CancellationToken,
) -> Result<(), HandlerError> {
    tokio::select! {
        _ = cancel.cancelled() => Err(HandlerError::Cancelled),
        _ = tokio::time::sleep(duration) => Ok(()),
    }
}

/// First text content item of a call result.
pub fn first_text(result: &CallToolResult) -> Option<String> {
    result
        .content
        .iter()
        .find_map(|content| content.as_text().map(|text| text.text.clone()))
}
