//! Tool, parameter, and startup-configuration data model.
use std::{fmt, future::Future, sync::Arc};

use futures::future::BoxFuture;
use rmcp::model::CallToolResult;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::lib::errors::HandlerError;

/// Argument mapping handed to a tool handler, keyed by parameter name.
pub type ToolArguments = serde_json::Map<String, serde_json::Value>;

/// Declared value shape of a single tool parameter.
///
/// Descriptive only: the host never coerces or validates supplied argument
/// values against the declared kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl ParameterKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ParameterKind::String => "string",
            ParameterKind::Number => "number",
            ParameterKind::Boolean => "boolean",
            ParameterKind::Object => "object",
            ParameterKind::Array => "array",
        }
    }
}

/// One named, described input slot of a tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDefinition {
    pub name: String,
    pub kind: ParameterKind,
    pub description: String,
}

impl ParameterDefinition {
    pub fn new(
        name: impl Into<String>,
        kind: ParameterKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
        }
    }
}

/// Invocable behind a registered tool.
///
/// Handlers receive the caller-supplied arguments and the invocation's
/// cancellation token; cancellation is cooperative, so a handler must watch
/// the token across its own suspension points.
pub trait ToolHandler: Send + Sync {
    fn invoke(
        &self,
        arguments: ToolArguments,
        cancel: CancellationToken,
    ) -> BoxFuture<'static, Result<CallToolResult, HandlerError>>;
}

impl<F, Fut> ToolHandler for F
where
    F: Fn(ToolArguments, CancellationToken) -> Fut + Send + Sync,
    Fut: Future<Output = Result<CallToolResult, HandlerError>> + Send + 'static,
{
    fn invoke(
        &self,
        arguments: ToolArguments,
        cancel: CancellationToken,
    ) -> BoxFuture<'static, Result<CallToolResult, HandlerError>> {
        Box::pin(self(arguments, cancel))
    }
}

/// A named, described, invocable operation advertised to MCP clients.
///
/// Created by the embedding application at startup and held read-only by the
/// runner for the lifetime of the server.
#[derive(Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterDefinition>,
    pub handler: Arc<dyn ToolHandler>,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Vec<ParameterDefinition>,
        handler: impl ToolHandler + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            handler: Arc::new(handler),
        }
    }
}

impl fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Immutable startup configuration handed to the runner.
#[derive(Debug, Clone)]
pub struct InitializationData {
    pub server_name: String,
    pub server_version: String,
    pub port: u16,
    pub tools: Vec<ToolDefinition>,
}

impl InitializationData {
    pub fn new(
        server_name: impl Into<String>,
        server_version: impl Into<String>,
        port: u16,
        tools: Vec<ToolDefinition>,
    ) -> Self {
        Self {
            server_name: server_name.into(),
            server_version: server_version.into(),
            port,
            tools,
        }
    }
}
