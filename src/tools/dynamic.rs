//! Dynamic tool provider: runtime-discovered tools (e.g., MCP).

use std::sync::Arc;

use async_trait::async_trait;

use super::arguments::ToolArguments;
use super::tool::{Tool, ToolExecutionContext};
use super::types::AgentToolParameters;
use crate::error::ConciergeError;

/// A tool discovered at runtime (e.g., from an MCP server).
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicTool {
    pub name: String,
    pub description: String,
    pub parameters: AgentToolParameters,
}

/// Trait for providers that can discover and execute tools at runtime.
#[async_trait]
pub trait DynamicToolProvider: Send + Sync {
    /// List available tools.
    async fn list_tools(&self) -> Result<Vec<DynamicTool>, ConciergeError>;

    /// Execute a tool by name.
    async fn execute_tool(
        &self,
        name: &str,
        args: &ToolArguments,
        ctx: &ToolExecutionContext,
    ) -> Result<serde_json::Value, ConciergeError>;

    /// Look up a tool by name.
    ///
    /// `Ok(None)` means the provider answered but does not expose the tool.
    async fn find_tool(&self, name: &str) -> Result<Option<DynamicTool>, ConciergeError> {
        Ok(self
            .list_tools()
            .await?
            .into_iter()
            .find(|tool| tool.name == name))
    }
}

/// Adapter that exposes a [`DynamicTool`] through the core [`Tool`] trait.
pub struct DynamicToolAdapter {
    provider: Arc<dyn DynamicToolProvider>,
    tool: DynamicTool,
}

impl DynamicToolAdapter {
    /// Create a new adapter for a discovered tool.
    pub fn new(provider: Arc<dyn DynamicToolProvider>, tool: DynamicTool) -> Self {
        Self { provider, tool }
    }

    /// Resolve `name` on `provider` into a callable handle, if exposed.
    pub async fn resolve(
        provider: Arc<dyn DynamicToolProvider>,
        name: &str,
    ) -> Result<Option<Self>, ConciergeError> {
        let found = provider.find_tool(name).await?;
        Ok(found.map(|tool| Self::new(provider, tool)))
    }
}

#[async_trait]
impl Tool for DynamicToolAdapter {
    fn name(&self) -> &str {
        &self.tool.name
    }

    fn description(&self) -> &str {
        &self.tool.description
    }

    fn parameters(&self) -> &AgentToolParameters {
        &self.tool.parameters
    }

    async fn execute(
        &self,
        args: &ToolArguments,
        ctx: &ToolExecutionContext,
    ) -> Result<serde_json::Value, ConciergeError> {
        self.provider.execute_tool(&self.tool.name, args, ctx).await
    }
}
