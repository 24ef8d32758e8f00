//! CLI entrypoint module structure.

pub mod args;

pub use args::{resolve_config_path, HostArgs};
