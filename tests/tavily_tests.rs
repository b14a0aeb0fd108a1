//! Web search client and tool against a mock Tavily server.

use std::sync::Arc;

use concierge::integrations::{web_search_tool, TavilyClient};
use concierge::tools::{ToolArguments, ToolExecutionContext};
use concierge::util::retry::RetryPolicy;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn search_body() -> serde_json::Value {
    json!({
        "query": "mushroom risotto",
        "results": [
            {
                "title": "Classic Mushroom Risotto",
                "url": "https://recipes.example/risotto",
                "content": "Toast arborio rice, add stock gradually.",
                "score": 0.92
            }
        ]
    })
}

#[tokio::test]
async fn search_sends_key_query_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("authorization", "Bearer tvly-test"))
        .and(body_partial_json(json!({
            "api_key": "tvly-test",
            "query": "mushroom risotto",
            "max_results": 5
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = TavilyClient::new("tvly-test", server.uri());
    let response = client.search("mushroom risotto").await.unwrap();

    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].title, "Classic Mushroom Risotto");
    assert_eq!(response.results[0].score, Some(0.92));
}

#[tokio::test]
async fn tool_returns_result_set_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
        .mount(&server)
        .await;

    let tool = web_search_tool(Arc::new(TavilyClient::new("tvly-test", server.uri())));
    let value = tool
        .execute(
            &ToolArguments::new(json!({"query": "mushroom risotto"})),
            &ToolExecutionContext::default(),
        )
        .await
        .unwrap();

    assert_eq!(value["results"][0]["url"], "https://recipes.example/risotto");
}

#[tokio::test]
async fn server_failure_becomes_failure_string() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .expect(1)
        .mount(&server)
        .await;

    let client = TavilyClient::new("tvly-test", server.uri()).with_retry(RetryPolicy::none());
    let tool = web_search_tool(Arc::new(client));
    let value = tool
        .execute(
            &ToolArguments::new(json!({"query": "venues in Rome"})),
            &ToolExecutionContext::default(),
        )
        .await
        .unwrap();

    let text = value.as_str().unwrap();
    assert!(text.starts_with("Error searching the web: "), "got: {text}");
    assert!(text.contains("upstream down"));
}

#[tokio::test]
async fn bad_key_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .expect(1)
        .mount(&server)
        .await;

    let client = TavilyClient::new("wrong", server.uri());
    let err = client.search("anything").await.unwrap_err();

    assert!(!err.is_retryable());
}
