//! Tool model: definitions, wire schema, registry, and built-in samples.

pub mod builtin;
pub mod definition;
pub mod registry;
pub mod schema;

pub use definition::{
    InitializationData, ParameterDefinition, ParameterKind, ToolArguments, ToolDefinition,
    ToolHandler,
};
pub use registry::ToolRegistry;
pub use schema::{Property, ToolSchema};
