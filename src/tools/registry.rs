//! Read-only tool registry: advertisement descriptors plus dispatch table.
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use rmcp::model::{CallToolResult, Tool};
use tokio_util::sync::CancellationToken;

use crate::lib::errors::{DispatchError, RegistryError};

use super::{
    definition::{ToolArguments, ToolDefinition},
    schema::ToolSchema,
};

/// Registry built once at startup from the configured tool definitions.
///
/// Read-only after construction; request tasks share it through an `Arc`
/// without further synchronization.
#[derive(Debug)]
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Validate and index the tool collection.
    ///
    /// Rejects duplicate tool names and duplicate parameter names within one
    /// tool before any listener exists, so ambiguous dispatch is never
    /// reachable at runtime.
    pub fn new(tools: Vec<ToolDefinition>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(tools.len());
        for (position, tool) in tools.iter().enumerate() {
            let mut seen_parameters = HashSet::new();
            for parameter in &tool.parameters {
                if !seen_parameters.insert(parameter.name.as_str()) {
                    return Err(RegistryError::DuplicateParameter {
                        tool: tool.name.clone(),
                        parameter: parameter.name.clone(),
                    });
                }
            }

            if index.insert(tool.name.clone(), position).is_some() {
                return Err(RegistryError::DuplicateToolName {
                    name: tool.name.clone(),
                });
            }
        }

        Ok(Self { tools, index })
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Descriptors advertised through `tools/list`, in registration order.
    pub fn advertised(&self) -> Vec<Tool> {
        self.tools
            .iter()
            .map(|tool| {
                let schema = ToolSchema::from_parameters(&tool.parameters);
                Tool::new(
                    tool.name.clone(),
                    tool.description.clone(),
                    Arc::new(schema.into_input_schema()),
                )
            })
            .collect()
    }

    /// Invoke the named tool with the caller's arguments and token.
    ///
    /// Handler failures are returned to this caller only; they carry no
    /// shared state and cannot affect other in-flight invocations.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: ToolArguments,
        cancel: CancellationToken,
    ) -> Result<CallToolResult, DispatchError> {
        let tool = self
            .index
            .get(name)
            .map(|&position| &self.tools[position])
            .ok_or_else(|| DispatchError::UnknownTool {
                name: name.to_string(),
            })?;

        tool.handler
            .invoke(arguments, cancel)
            .await
            .map_err(DispatchError::Handler)
    }
}
