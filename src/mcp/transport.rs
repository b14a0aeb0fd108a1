//! MCP transport layer.

use async_trait::async_trait;
use rmcp::model::ClientInfo;
use rmcp::service::{ClientInitializeError, DynService, RoleClient, RunningService, ServiceExt};
use rmcp::transport::StreamableHttpClientTransport;

pub type DynClientService = Box<dyn DynService<RoleClient>>;
pub type MCPRunningService = RunningService<RoleClient, DynClientService>;

/// Transport trait for MCP communication.
#[async_trait]
pub trait MCPTransport: Send {
    /// Create and initialize a new rmcp running service for this transport.
    async fn connect(
        &mut self,
        client_info: ClientInfo,
    ) -> Result<MCPRunningService, ClientInitializeError>;

    /// Human-readable endpoint, for logs.
    fn endpoint(&self) -> &str;
}

/// Streamable-HTTP transport for remote MCP servers.
pub struct StreamableHttpTransport {
    url: String,
}

impl StreamableHttpTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MCPTransport for StreamableHttpTransport {
    async fn connect(
        &mut self,
        client_info: ClientInfo,
    ) -> Result<MCPRunningService, ClientInitializeError> {
        tracing::debug!(url = %self.url, "connecting to MCP server");
        let transport = StreamableHttpClientTransport::from_uri(self.url.clone());
        client_info.into_dyn().serve(transport).await
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_keeps_url() {
        let transport = StreamableHttpTransport::new("https://mcp.kiwi.com");
        assert_eq!(transport.url(), "https://mcp.kiwi.com");
        assert_eq!(transport.endpoint(), "https://mcp.kiwi.com");
    }
}
