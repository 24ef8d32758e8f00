use std::time::Duration;

use anyhow::Result;
use rmcp::{
    model::{CallToolRequestParam, ClientInfo},
    serve_client,
    transport::SseClientTransport,
};
use serde_json::json;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use toolhost_mcp::{lib::errors::ServeError, server::runtime::run_server};

use crate::common::{first_text, test_init_data};

const PORT: u16 = 3001;
const CONNECT_ATTEMPTS: usize = 20;

#[tokio::test]
async fn sse_round_trip_lists_and_calls_tools() -> Result<()> {
    let cancel = CancellationToken::new();
    let run_task = tokio::spawn(run_server(test_init_data(PORT), None, cancel.clone()));

    let url = format!("http://127.0.0.1:{PORT}/sse");
    let mut attempt = 0;
    let client = loop {
        match SseClientTransport::start(url.as_str()).await {
            Ok(transport) => break serve_client(ClientInfo::default(), transport).await?,
            Err(_) if attempt < CONNECT_ATTEMPTS => {
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            Err(err) => return Err(err.into()),
        }
    };

    let list = client.list_tools(None).await?;
    let names: Vec<_> = list.tools.iter().map(|tool| tool.name.to_string()).collect();
    assert!(names.contains(&"test_tool".to_string()), "tools: {names:?}");
    assert!(names.contains(&"echo_tool".to_string()), "tools: {names:?}");

    let echo = list
        .tools
        .iter()
        .find(|tool| tool.name == "echo_tool")
        .expect("echo_tool is advertised");
    let properties = echo
        .input_schema
        .get("properties")
        .and_then(|value| value.as_object())
        .expect("echo_tool advertises an object schema");
    assert!(properties.contains_key("message"), "{properties:?}");

    let result = client
        .call_tool(CallToolRequestParam {
            name: "echo_tool".into(),
            arguments: json!({"message": "hi"}).as_object().cloned(),
        })
        .await?;
    assert_eq!(first_text(&result).as_deref(), Some("Echo: hi"));

    let result = client
        .call_tool(CallToolRequestParam {
            name: "echo_tool".into(),
            arguments: None,
        })
        .await?;
    assert_eq!(first_text(&result).as_deref(), Some("Echo: No message"));

    client.cancel().await?;
    cancel.cancel();
    let outcome = timeout(Duration::from_secs(5), run_task).await??;
    assert!(matches!(outcome, Err(ServeError::Cancelled)), "{outcome:?}");
    Ok(())
}
