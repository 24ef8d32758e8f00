//! Telemetry initialization, log-sink abstraction, and invocation span helpers.

use std::{sync::Arc, time::Instant};

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, error, info, info_span, trace, warn, Level, Span};
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

/// Initialize `tracing` and format developer logs.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// Leveled sink for runner observability.
///
/// The runner treats the sink as pure output: supplying none changes what is
/// logged, never how the server behaves.
pub trait LogSink: Send + Sync {
    fn log(&self, level: Level, message: &str);
}

/// Null-object sink substituted when the caller supplies none.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogSink;

impl LogSink for NoopLogSink {
    fn log(&self, _level: Level, _message: &str) {}
}

/// Sink forwarding runner lines into `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => error!(target: "toolhost::runtime", "{message}"),
            Level::WARN => warn!(target: "toolhost::runtime", "{message}"),
            Level::INFO => info!(target: "toolhost::runtime", "{message}"),
            Level::DEBUG => debug!(target: "toolhost::runtime", "{message}"),
            Level::TRACE => trace!(target: "toolhost::runtime", "{message}"),
        }
    }
}

/// Resolve an optional sink into a concrete one.
pub fn sink_or_noop(sink: Option<Arc<dyn LogSink>>) -> Arc<dyn LogSink> {
    sink.unwrap_or_else(|| Arc::new(NoopLogSink))
}

/// Span helper to record start and finish of one tool invocation.
pub struct InvocationSpan {
    span: Span,
    started_at: Instant,
    invocation_id: Uuid,
}

impl InvocationSpan {
    /// Start an invocation span.
    pub fn start(invocation_id: Uuid, tool_name: &str) -> Self {
        let span = info_span!(
            target: "toolhost::tools",
            "tool_invocation",
            %invocation_id,
            tool_name
        );
        Self {
            span,
            started_at: Instant::now(),
            invocation_id,
        }
    }

    /// Close the span while recording status and elapsed time.
    pub fn finish(self, status: &'static str) {
        let elapsed_ms = self.started_at.elapsed().as_millis();
        let _entered = self.span.enter();
        info!(
            target: "toolhost::tools",
            invocation_id = %self.invocation_id,
            status = status,
            elapsed_ms = elapsed_ms,
            "Completed tool invocation"
        );
    }
}

/// Payload for logging MCP runtime state as structured telemetry.
#[derive(Debug, Serialize)]
pub struct RuntimeModeTelemetry<'a> {
    pub transport: &'a str,
    pub bind_addr: &'a str,
    pub server_name: &'a str,
    pub server_version: &'a str,
    pub tool_count: usize,
    pub instructions: &'a str,
}

/// Emit runtime mode to `tracing`.
pub fn emit_runtime_mode(telemetry: &RuntimeModeTelemetry<'_>) {
    info!(
        target: "toolhost::runtime",
        transport = telemetry.transport,
        bind_addr = telemetry.bind_addr,
        server_name = telemetry.server_name,
        server_version = telemetry.server_version,
        tool_count = telemetry.tool_count,
        instructions = telemetry.instructions,
        "Started MCP server"
    );
}
