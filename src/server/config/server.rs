use std::path::Path;

use serde::Deserialize;

use crate::lib::errors::ConfigError;

pub const DEFAULT_PORT: u16 = 8787;

/// Server identity and socket settings.
#[derive(Debug, Clone)]
pub struct ServerSection {
    pub name: String,
    pub version: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawServerSection {
    pub name: Option<String>,
    pub version: Option<String>,
    pub port: Option<u16>,
}

pub fn parse_server_section(
    raw: Option<RawServerSection>,
    path: &Path,
) -> Result<ServerSection, ConfigError> {
    let server_raw = raw.unwrap_or_default();
    let name = server_raw
        .name
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
    let version = server_raw
        .version
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
    let port = server_raw.port.unwrap_or(DEFAULT_PORT);
    validate_name(&name, path)?;
    validate_port(port, path)?;
    Ok(ServerSection {
        name,
        version,
        port,
    })
}

fn validate_name(name: &str, path: &Path) -> Result<(), ConfigError> {
    if !name.trim().is_empty() {
        return Ok(());
    }

    Err(ConfigError::InvalidField {
        path: path.to_path_buf(),
        field: "server.name",
        message: "Server name must not be blank".into(),
    })
}

fn validate_port(port: u16, path: &Path) -> Result<(), ConfigError> {
    if (1024..=65535).contains(&port) {
        return Ok(());
    }

    Err(ConfigError::InvalidField {
        path: path.to_path_buf(),
        field: "server.port",
        message: "Use a port in the range 1024-65535".into(),
    })
}
