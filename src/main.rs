//! Entry point for Toolhost MCP.
use std::{process::ExitCode, sync::Arc};

use clap::Parser;
use tokio_util::sync::CancellationToken;
use toolhost_mcp::{
    cli::HostArgs,
    lib::telemetry::{self, LogSink, TracingLogSink},
    server::{
        config::ServerConfig,
        runtime::{self, RuntimeExit},
    },
    tools::{builtin, InitializationData},
};

#[tokio::main]
async fn main() -> ExitCode {
    match bootstrap().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(exit) => exit.report(),
    }
}

async fn bootstrap() -> Result<(), RuntimeExit> {
    telemetry::init_tracing().map_err(RuntimeExit::from_error)?;
    let args = HostArgs::parse();
    let config_path = args.config_path().map_err(RuntimeExit::from_error)?;
    let config = ServerConfig::load_from_path(config_path).map_err(RuntimeExit::from_error)?;

    let init = InitializationData::new(
        config.server.name.clone(),
        config.server.version.clone(),
        config.server.port,
        builtin::default_tools(),
    );

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!(target: "toolhost::runtime", "Received Ctrl-C; cancelling server run");
            signal_cancel.cancel();
        }
    });

    let sink: Arc<dyn LogSink> = Arc::new(TracingLogSink);
    match runtime::run_server(init, Some(sink), cancel).await {
        Err(err) if err.is_cancellation() => Ok(()),
        Err(err) => Err(RuntimeExit::from_error(err)),
        Ok(()) => Ok(()),
    }
}
