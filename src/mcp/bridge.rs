//! Bridge MCP tools into the concierge tool system.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::ConciergeError;
use crate::tools::arguments::ToolArguments;
use crate::tools::dynamic::{DynamicTool, DynamicToolProvider};
use crate::tools::tool::ToolExecutionContext;
use crate::tools::types::AgentToolParameters;

use super::client::{MCPClient, MCPToolCallResult};
use super::schema::MCPToolSchema;
use super::transport::StreamableHttpTransport;

#[async_trait]
trait MCPClientOps: Send {
    async fn initialize(&mut self) -> Result<(), ConciergeError>;
    async fn list_tools(&mut self) -> Result<Vec<MCPToolSchema>, ConciergeError>;
    async fn call_tool(
        &mut self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<MCPToolCallResult, ConciergeError>;
}

#[async_trait]
impl MCPClientOps for MCPClient {
    async fn initialize(&mut self) -> Result<(), ConciergeError> {
        MCPClient::initialize(self).await
    }

    async fn list_tools(&mut self) -> Result<Vec<MCPToolSchema>, ConciergeError> {
        MCPClient::list_tools(self).await
    }

    async fn call_tool(
        &mut self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<MCPToolCallResult, ConciergeError> {
        MCPClient::call_tool(self, name, arguments).await
    }
}

/// Adapts an MCP client to the DynamicToolProvider trait.
///
/// Calls are serialized over one session; the connection is opened on
/// first use.
pub struct MCPToolAdapter {
    client: Mutex<Box<dyn MCPClientOps>>,
}

impl MCPToolAdapter {
    pub fn new(client: MCPClient) -> Self {
        Self {
            client: Mutex::new(Box::new(client)),
        }
    }

    /// Adapter for a remote server reachable over streamable HTTP.
    pub fn streamable_http(url: impl Into<String>) -> Self {
        Self::new(MCPClient::new(Box::new(StreamableHttpTransport::new(url))))
    }

    #[cfg(test)]
    fn from_client_ops(client: Box<dyn MCPClientOps>) -> Self {
        Self {
            client: Mutex::new(client),
        }
    }
}

#[async_trait]
impl DynamicToolProvider for MCPToolAdapter {
    async fn list_tools(&self) -> Result<Vec<DynamicTool>, ConciergeError> {
        let mut client = self.client.lock().await;
        client.initialize().await?;
        let tools = client.list_tools().await?;
        Ok(tools.into_iter().map(map_mcp_tool_to_dynamic).collect())
    }

    async fn execute_tool(
        &self,
        name: &str,
        args: &ToolArguments,
        _ctx: &ToolExecutionContext,
    ) -> Result<serde_json::Value, ConciergeError> {
        let mut client = self.client.lock().await;
        client.initialize().await?;
        let result = client.call_tool(name, args.raw().clone()).await?;
        Ok(result.into_value_or_text())
    }
}

fn map_mcp_tool_to_dynamic(tool: MCPToolSchema) -> DynamicTool {
    DynamicTool {
        name: tool.name,
        description: tool.description.unwrap_or_default(),
        parameters: AgentToolParameters::from_schema(tool.input_schema),
    }
}
