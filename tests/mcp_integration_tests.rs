#![cfg(feature = "mcp")]

use std::collections::HashSet;
use std::time::Duration;

use concierge::integrations::flights::{flight_search_tool, FlightQuery, FlightSearch, FlightSearchOutcome};
use concierge::mcp::{MCPClient, StreamableHttpTransport};
use concierge::tools::{ToolArguments, ToolExecutionContext};
use serde_json::json;
use tokio::time::timeout;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn flight_tool_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "origin": { "type": "string" },
            "destination": { "type": "string" },
            "passengers": { "type": "integer" }
        },
        "required": ["origin", "destination", "passengers"]
    })
}

fn mock_mcp_handler(
    server_name: &'static str,
    tools: &'static [&'static str],
) -> impl Fn(&Request) -> ResponseTemplate + Send + Sync {
    move |request: &Request| {
        let body: serde_json::Value = request.body_json().unwrap_or_else(|_| json!({}));
        let method = body.get("method").and_then(|value| value.as_str()).unwrap_or_default();
        let id = body.get("id").cloned().unwrap_or_else(|| json!(1));

        match method {
            "initialize" => ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "protocolVersion": "2025-03-26",
                    "capabilities": { "tools": { "listChanged": false } },
                    "serverInfo": { "name": server_name, "version": "0.1.0" }
                }
            })),
            "tools/list" => {
                let definitions: Vec<_> = tools
                    .iter()
                    .map(|name| {
                        json!({
                            "name": name,
                            "description": format!("{server_name} {name}"),
                            "inputSchema": flight_tool_schema()
                        })
                    })
                    .collect();
                ResponseTemplate::new(200).set_body_json(json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": { "tools": definitions, "nextCursor": null }
                }))
            }
            "tools/call" => {
                let arguments = body
                    .get("params")
                    .and_then(|params| params.get("arguments"))
                    .cloned()
                    .unwrap_or_else(|| json!({}));
                let text = format!(
                    "{} -> {} x{}: 2 itineraries from 640 USD",
                    arguments["origin"].as_str().unwrap_or("?"),
                    arguments["destination"].as_str().unwrap_or("?"),
                    arguments["passengers"]
                );
                ResponseTemplate::new(200).set_body_json(json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": {
                        "content": [{ "type": "text", "text": text }],
                        "isError": false
                    }
                }))
            }
            "notifications/initialized" => ResponseTemplate::new(202),
            _ => ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {}
            })),
        }
    }
}

async fn mock_server(tools: &'static [&'static str]) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mcp"))
        .respond_with(mock_mcp_handler("kiwi-mock", tools))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/mcp"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&server)
        .await;
    server
}

fn request_methods(requests: &[Request]) -> HashSet<String> {
    requests
        .iter()
        .filter_map(|request| {
            request
                .body_json::<serde_json::Value>()
                .ok()
                .and_then(|body| body.get("method").and_then(|m| m.as_str()).map(str::to_string))
        })
        .collect()
}

#[tokio::test]
async fn streamable_http_client_discovers_and_calls_tools() {
    let server = mock_server(&["search_flights", "feedback_to_devs"]).await;
    let mut client = MCPClient::new(Box::new(StreamableHttpTransport::new(format!(
        "{}/mcp",
        server.uri()
    ))));

    timeout(Duration::from_secs(5), client.initialize())
        .await
        .expect("initialize should complete before timeout")
        .expect("MCP client should initialize");
    assert!(client.is_initialized());

    let tools = timeout(Duration::from_secs(5), client.list_tools())
        .await
        .expect("tools/list should complete before timeout")
        .expect("MCP client should list tools");
    assert_eq!(tools.len(), 2);
    assert!(tools.iter().any(|tool| tool.name == "search_flights"));

    let result = timeout(
        Duration::from_secs(5),
        client.call_tool(
            "search_flights",
            json!({"origin": "Lima", "destination": "Rome", "passengers": 80}),
        ),
    )
    .await
    .expect("tools/call should complete before timeout")
    .expect("tool call should succeed");
    assert_eq!(
        result.into_value_or_text(),
        json!("Lima -> Rome x80: 2 itineraries from 640 USD")
    );

    client.close().await;
    let requests = server.received_requests().await.expect("requests recorded");
    let methods = request_methods(&requests);
    assert!(methods.contains("initialize"));
    assert!(methods.contains("tools/list"));
    assert!(methods.contains("tools/call"));
}

#[tokio::test]
async fn flight_search_forwards_query_to_remote_tool() {
    let server = mock_server(&["search_flights"]).await;
    let search = FlightSearch::mcp(format!("{}/mcp", server.uri()));

    let outcome = timeout(
        Duration::from_secs(10),
        search.search(&FlightQuery {
            origin: "Lima".into(),
            destination: "Rome".into(),
            passengers: 80,
        }),
    )
    .await
    .expect("search should complete before timeout")
    .expect("search should succeed");

    assert_eq!(
        outcome,
        FlightSearchOutcome::Found("Lima -> Rome x80: 2 itineraries from 640 USD".into())
    );
}

#[tokio::test]
async fn server_without_search_flights_is_reported() {
    let server = mock_server(&["feedback_to_devs"]).await;
    let tool = flight_search_tool(FlightSearch::mcp(format!("{}/mcp", server.uri())));

    let value = timeout(
        Duration::from_secs(10),
        tool.execute(
            &ToolArguments::new(json!({"origin": "Lima", "destination": "Rome", "passengers": 2})),
            &ToolExecutionContext::default(),
        ),
    )
    .await
    .expect("tool should complete before timeout")
    .expect("guarded tool never errors");

    assert_eq!(value, json!("The flight server does not expose the search_flights tool."));
    let requests = server.received_requests().await.expect("requests recorded");
    assert!(!request_methods(&requests).contains("tools/call"));
}

#[tokio::test]
async fn unreachable_server_becomes_failure_text() {
    let tool = flight_search_tool(FlightSearch::mcp("http://127.0.0.1:9/mcp"));

    let value = timeout(
        Duration::from_secs(30),
        tool.execute(
            &ToolArguments::new(json!({"origin": "Lima", "destination": "Rome", "passengers": 2})),
            &ToolExecutionContext::default(),
        ),
    )
    .await
    .expect("tool should complete before timeout")
    .expect("guarded tool never errors");

    let text = value.as_str().unwrap();
    assert!(text.starts_with("Error searching flights: "), "got: {text}");
}
