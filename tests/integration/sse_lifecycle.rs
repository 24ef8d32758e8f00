use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::{net::TcpListener, time::timeout};
use tokio_util::sync::CancellationToken;
use toolhost_mcp::{
    lib::{
        errors::{RegistryError, ServeError},
        telemetry::{LogSink, NoopLogSink},
    },
    server::runtime::run_server,
    tools::InitializationData,
};

use crate::common::{echo_tool, test_init_data};

const SHUTDOWN_DEADLINE: Duration = Duration::from_secs(5);

#[tokio::test]
async fn pre_cancelled_token_fails_immediately_without_binding() {
    let port = 3101;
    // Holding the port ourselves: any bind attempt by the runner would
    // surface as a transport failure instead of the expected cancellation.
    let _holder = TcpListener::bind(("127.0.0.1", port))
        .await
        .expect("test can pre-bind the port");

    let cancel = CancellationToken::new();
    cancel.cancel();
    let started = Instant::now();
    let result = run_server(test_init_data(port), None, cancel).await;

    assert!(matches!(result, Err(ServeError::Cancelled)), "{result:?}");
    assert!(
        started.elapsed() < Duration::from_secs(1),
        "pre-cancelled run must fail without waiting"
    );
}

#[tokio::test]
async fn started_server_cancels_within_bounds_and_releases_the_port() {
    let port = 3102;
    let cancel = CancellationToken::new();
    let run_task = tokio::spawn(run_server(test_init_data(port), None, cancel.clone()));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(
        !run_task.is_finished(),
        "server must still be running before cancellation"
    );
    cancel.cancel();

    let result = timeout(SHUTDOWN_DEADLINE, run_task)
        .await
        .expect("run task must terminate after cancellation")
        .expect("run task must not panic");
    assert!(matches!(result, Err(ServeError::Cancelled)), "{result:?}");

    let released_by = Instant::now() + Duration::from_secs(1);
    loop {
        match TcpListener::bind(("127.0.0.1", port)).await {
            Ok(_) => break,
            Err(_) if Instant::now() < released_by => {
                tokio::time::sleep(Duration::from_millis(25)).await;
            }
            Err(err) => panic!("port {port} still bound after shutdown: {err}"),
        }
    }
}

#[tokio::test]
async fn empty_tool_collection_still_serves() {
    let port = 3103;
    let init = InitializationData::new("TestServer", "1.0.0", port, vec![]);
    let cancel = CancellationToken::new();
    let run_task = tokio::spawn(run_server(init, None, cancel.clone()));

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(
        !run_task.is_finished(),
        "a server without tools must start and keep listening"
    );

    cancel.cancel();
    let result = timeout(SHUTDOWN_DEADLINE, run_task)
        .await
        .expect("run task must terminate after cancellation")
        .expect("run task must not panic");
    assert!(matches!(result, Err(ServeError::Cancelled)), "{result:?}");
}

#[tokio::test]
async fn duplicate_tool_names_fail_before_any_listener_exists() {
    let port = 3104;
    let _holder = TcpListener::bind(("127.0.0.1", port))
        .await
        .expect("test can pre-bind the port");

    let init = InitializationData::new(
        "TestServer",
        "1.0.0",
        port,
        vec![echo_tool(), echo_tool()],
    );
    let result = run_server(init, None, CancellationToken::new()).await;

    match result {
        Err(ServeError::Registry(RegistryError::DuplicateToolName { name })) => {
            assert_eq!(name, "echo_tool");
        }
        other => panic!("Unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn occupied_port_surfaces_a_transport_failure() {
    let port = 3105;
    let _holder = TcpListener::bind(("127.0.0.1", port))
        .await
        .expect("test can pre-bind the port");

    let result = run_server(test_init_data(port), None, CancellationToken::new()).await;

    match result {
        Err(err @ ServeError::Transport { .. }) => {
            assert!(!err.is_cancellation());
        }
        other => panic!("Unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn missing_sink_matches_noop_sink_behaviour() {
    let cases: [(u16, Option<Arc<dyn LogSink>>); 2] =
        [(3106, None), (3107, Some(Arc::new(NoopLogSink)))];

    for (port, sink) in cases {
        let cancel = CancellationToken::new();
        let run_task = tokio::spawn(run_server(test_init_data(port), sink, cancel.clone()));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(
            !run_task.is_finished(),
            "server on port {port} must be running regardless of sink"
        );

        cancel.cancel();
        let result = timeout(SHUTDOWN_DEADLINE, run_task)
            .await
            .expect("run task must terminate after cancellation")
            .expect("run task must not panic");
        assert!(matches!(result, Err(ServeError::Cancelled)), "{result:?}");
    }
}
