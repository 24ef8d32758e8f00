use std::{io, net::SocketAddr, process::ExitCode, sync::Arc, time::Duration};

use anyhow::Error;
use rmcp::transport::sse_server::{SseServer, SseServerConfig};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::Level;

use crate::{
    lib::{
        errors::ServeError,
        telemetry::{self, LogSink, RuntimeModeTelemetry},
    },
    server::runtime::{build_instructions, ToolHostServer},
    tools::{InitializationData, ToolRegistry},
};

/// SSE stream endpoint path.
pub const SSE_PATH: &str = "/sse";
/// Client-to-server message endpoint path.
pub const POST_PATH: &str = "/message";
/// Bound wait for the HTTP task to drain after cancellation fires.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Bundles a runtime error message with an exit code.
#[derive(Debug)]
pub struct RuntimeExit {
    message: String,
    exit_code: ExitCode,
}

impl RuntimeExit {
    pub fn from_error(err: impl Into<Error>) -> Self {
        let err = err.into();
        Self {
            message: format!("{err:?}"),
            exit_code: ExitCode::FAILURE,
        }
    }

    pub fn report(self) -> ExitCode {
        eprintln!("{}", self.message);
        self.exit_code
    }

    pub fn exit_code(&self) -> ExitCode {
        self.exit_code
    }
}

/// Serve `init.tools` over SSE on the loopback interface until `cancel` fires.
///
/// Never completes normally: the future resolves only through `ServeError`,
/// and `ServeError::Cancelled` is the clean-shutdown outcome. A token that is
/// already cancelled at call time fails immediately without binding a socket
/// or touching any other resource.
pub async fn run_server(
    init: InitializationData,
    sink: Option<Arc<dyn LogSink>>,
    cancel: CancellationToken,
) -> Result<(), ServeError> {
    let sink = telemetry::sink_or_noop(sink);

    if cancel.is_cancelled() {
        sink.log(
            Level::INFO,
            "Cancellation requested before startup; skipping listener setup",
        );
        return Err(ServeError::Cancelled);
    }

    let InitializationData {
        server_name,
        server_version,
        port,
        tools,
    } = init;

    let registry = Arc::new(ToolRegistry::new(tools)?);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    let (sse_server, router) = SseServer::new(SseServerConfig {
        bind: addr,
        sse_path: SSE_PATH.to_string(),
        post_path: POST_PATH.to_string(),
        ct: cancel.clone(),
        sse_keep_alive: None,
    });

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Transport { addr, source })?;

    let instructions = build_instructions(&server_name, &server_version, registry.len(), &addr);
    telemetry::emit_runtime_mode(&RuntimeModeTelemetry {
        transport: "sse",
        bind_addr: &addr.to_string(),
        server_name: &server_name,
        server_version: &server_version,
        tool_count: registry.len(),
        instructions: &instructions,
    });
    sink.log(Level::INFO, &format!("Listening on {addr}"));

    let shutdown = cancel.clone();
    let http = axum::serve(listener, router).with_graceful_shutdown(async move {
        shutdown.cancelled().await;
    });
    let mut http_task = tokio::spawn(async move { http.await });

    let server = ToolHostServer::new(
        server_name,
        server_version,
        instructions,
        Arc::clone(&registry),
    );
    sse_server.with_service(move || server.clone());

    tokio::select! {
        _ = cancel.cancelled() => {}
        join_result = &mut http_task => {
            let source = flatten_http_exit(join_result);
            sink.log(
                Level::ERROR,
                &format!("HTTP listener on {addr} terminated unexpectedly: {source}"),
            );
            return Err(ServeError::Transport { addr, source });
        }
    }

    sink.log(Level::INFO, "Cancellation received; shutting down listener");
    if tokio::time::timeout(SHUTDOWN_GRACE, &mut http_task)
        .await
        .is_err()
    {
        // A handler ignoring its token must not hold shutdown hostage.
        sink.log(
            Level::WARN,
            "HTTP task did not drain within the shutdown grace period; aborting it",
        );
        http_task.abort();
        let _ = http_task.await;
    }

    sink.log(Level::INFO, "Server run cancelled");
    Err(ServeError::Cancelled)
}

fn flatten_http_exit(join_result: Result<io::Result<()>, tokio::task::JoinError>) -> io::Error {
    match join_result {
        Ok(Ok(())) => io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "HTTP server exited before cancellation",
        ),
        Ok(Err(err)) => err,
        Err(join_err) => io::Error::new(io::ErrorKind::Other, join_err.to_string()),
    }
}
