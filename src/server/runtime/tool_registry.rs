use std::sync::Arc;

use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, Content, ErrorData, Implementation,
        ListToolsResult, PaginatedRequestParam, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    ServerHandler,
};
use uuid::Uuid;

use crate::{
    lib::{
        errors::{DispatchError, HandlerError},
        telemetry::InvocationSpan,
    },
    tools::ToolRegistry,
};

/// rmcp service adapter exposing a registry built at runtime.
///
/// The `#[tool_router]` macros require the tool set to be known at compile
/// time; this host receives its tools as data, so `ServerHandler` is
/// implemented directly against the registry's advertisement and dispatch
/// operations.
#[derive(Clone)]
pub struct ToolHostServer {
    inner: Arc<ToolHostInner>,
}

struct ToolHostInner {
    server_name: String,
    server_version: String,
    instructions: String,
    registry: Arc<ToolRegistry>,
}

impl ToolHostServer {
    pub fn new(
        server_name: impl Into<String>,
        server_version: impl Into<String>,
        instructions: impl Into<String>,
        registry: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            inner: Arc::new(ToolHostInner {
                server_name: server_name.into(),
                server_version: server_version.into(),
                instructions: instructions.into(),
                registry,
            }),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.inner.registry
    }
}

impl ServerHandler for ToolHostServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.inner.server_name.clone(),
                version: self.inner.server_version.clone(),
                ..Implementation::default()
            },
            instructions: Some(self.inner.instructions.clone()),
            ..ServerInfo::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            tools: self.inner.registry.advertised(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let invocation_id = Uuid::new_v4();
        let span = InvocationSpan::start(invocation_id, &request.name);
        let arguments = request.arguments.unwrap_or_default();

        match self
            .inner
            .registry
            .dispatch(&request.name, arguments, context.ct.clone())
            .await
        {
            Ok(result) => {
                span.finish("completed");
                Ok(result)
            }
            Err(DispatchError::UnknownTool { name }) => {
                span.finish("unknown_tool");
                Err(ErrorData::invalid_params(
                    format!("No tool named `{name}` is registered"),
                    None,
                ))
            }
            // Handler failures stay scoped to this caller: they become an
            // error-content result, never a dead listener.
            Err(DispatchError::Handler(HandlerError::Cancelled)) => {
                span.finish("cancelled");
                Ok(CallToolResult::error(vec![Content::text(
                    "Tool invocation was cancelled",
                )]))
            }
            Err(DispatchError::Handler(err)) => {
                span.finish("handler_error");
                Ok(CallToolResult::error(vec![Content::text(err.to_string())]))
            }
        }
    }
}
