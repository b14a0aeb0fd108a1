//! Tavily web search client and the `web_search` tool.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::ConciergeConfig;
use crate::error::ConciergeError;
use crate::provider::http::{bearer_headers, shared_client, status_to_error};
use crate::tools::{AgentTool, AgentToolParameters, GuardedTool, Tool};
use crate::util::retry::RetryPolicy;

pub const WEB_SEARCH_TOOL: &str = "web_search";
pub const WEB_SEARCH_FAILURE: &str = "Error searching the web";

const DEFAULT_MAX_RESULTS: u32 = 5;

/// One search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Result set returned by `POST /search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

/// Minimal Tavily search client.
#[derive(Clone)]
pub struct TavilyClient {
    api_key: String,
    base_url: String,
    max_results: u32,
    retry: RetryPolicy,
}

impl TavilyClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            retry: RetryPolicy::default(),
        }
    }

    /// Build from config; fails when `TAVILY_API_KEY` is not set.
    pub fn from_config(config: &ConciergeConfig) -> Result<Self, ConciergeError> {
        Ok(Self::new(
            config.require_tavily_api_key()?,
            config.tavily_base_url.clone(),
        ))
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Run a search query.
    pub async fn search(&self, query: &str) -> Result<SearchResponse, ConciergeError> {
        if query.trim().is_empty() {
            return Err(ConciergeError::InvalidArgument(
                "search query must not be empty".into(),
            ));
        }
        tracing::debug!(query, "tavily search");
        self.retry.execute(|| self.search_once(query)).await
    }

    async fn search_once(&self, query: &str) -> Result<SearchResponse, ConciergeError> {
        let body = serde_json::json!({
            "api_key": self.api_key,
            "query": query,
            "max_results": self.max_results,
        });
        let resp = shared_client()
            .post(format!("{}/search", self.base_url))
            .headers(bearer_headers(&self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status.as_u16(), &text));
        }
        Ok(resp.json().await?)
    }
}

impl std::fmt::Debug for TavilyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TavilyClient")
            .field("base_url", &self.base_url)
            .field("max_results", &self.max_results)
            .finish()
    }
}

/// `web_search(query)`: returns the JSON result set, or
/// `"Error searching the web: …"` on failure.
pub fn web_search_tool(client: Arc<TavilyClient>) -> Arc<dyn Tool> {
    let params = AgentToolParameters::object()
        .string("query", "What to search the web for", true)
        .build();
    let inner = AgentTool::new(
        WEB_SEARCH_TOOL,
        "Search the web and return titles, snippets and links",
        params,
        move |args, _ctx| {
            let client = client.clone();
            async move {
                let query = args.get_str("query")?;
                let response = client.search(query).await?;
                Ok(serde_json::to_value(response)?)
            }
        },
    );
    Arc::new(GuardedTool::new(Arc::new(inner), WEB_SEARCH_FAILURE))
}
