use std::{io, net::SocketAddr, path::PathBuf};

use config::ConfigError as ConfigLoaderError;
use thiserror::Error;

/// Errors that can occur while loading or validating configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to build (read) the configuration file.
    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Failed to deserialize TOML into a struct.
    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Required field is missing.
    #[error("Configuration file {path} is missing `{field}`")]
    MissingField { path: PathBuf, field: &'static str },
    /// Field failed validation.
    #[error("Configuration file {path} has invalid `{field}`: {message}")]
    InvalidField {
        path: PathBuf,
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    /// Helper to wrap `config::ConfigError` as a read failure.
    pub fn from_read_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::FileRead { path, source }
    }

    /// Helper to wrap `config::ConfigError` as a parse failure.
    pub fn from_parse_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::Parse { path, source }
    }
}

/// Rejections raised while building the tool registry.
///
/// Detected before the runner binds anything; never retried automatically.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Tool name `{name}` is registered more than once")]
    DuplicateToolName { name: String },
    #[error("Tool `{tool}` declares parameter `{parameter}` more than once")]
    DuplicateParameter { tool: String, parameter: String },
}

/// Failure raised by an individual tool handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Tool invocation was cancelled")]
    Cancelled,
    #[error("{message}")]
    Failed { message: String },
}

impl HandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// Failures while resolving and invoking a named tool.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("No tool named `{name}` is registered")]
    UnknownTool { name: String },
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

/// Terminal outcomes of a server run.
///
/// `Cancelled` is the only clean shutdown; a successful run has no other
/// reachable end state.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("Server run was cancelled")]
    Cancelled,
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("Transport failure on {addr}: {source}")]
    Transport {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}

impl ServeError {
    /// Clean-shutdown check for callers that map cancellation to success.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ServeError::Cancelled)
    }
}
