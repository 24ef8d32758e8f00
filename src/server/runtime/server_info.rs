use std::net::SocketAddr;

use super::{POST_PATH, SSE_PATH};

/// Build the `ServerInfo.instructions` string shown to MCP clients.
pub fn build_instructions(
    server_name: &str,
    server_version: &str,
    tool_count: usize,
    bind_addr: &SocketAddr,
) -> String {
    format!(
        "{server_name} {server_version} serving {tool_count} tool(s) over SSE. Open the event stream at http://{bind_addr}{SSE_PATH} and post messages to http://{bind_addr}{POST_PATH}."
    )
}
