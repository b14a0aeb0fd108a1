//! MCP client for connecting to MCP servers.

use rmcp::{
    model::{
        CallToolRequestParams, CallToolResult, Content, JsonObject, ProtocolVersion,
        ResourceContents,
    },
    service::{ClientInitializeError, ServiceError},
};

use crate::error::ConciergeError;

use super::schema::MCPToolSchema;
use super::transport::{MCPRunningService, MCPTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MCPConnectionState {
    Disconnected,
    Initialized,
    Closed,
}

#[derive(Debug, Clone)]
pub struct MCPToolCallResult {
    pub structured_content: Option<serde_json::Value>,
    pub text_content: Option<String>,
    pub content: Vec<serde_json::Value>,
}

impl MCPToolCallResult {
    /// Prefer text for model consumption, then structured content.
    pub fn into_value_or_text(self) -> serde_json::Value {
        if let Some(text) = self.text_content {
            return serde_json::Value::String(text);
        }
        if let Some(structured) = self.structured_content {
            return structured;
        }
        serde_json::Value::Array(self.content)
    }
}

/// Client for a Model Context Protocol server.
///
/// Connects lazily on [`MCPClient::initialize`] and reconnects once when the
/// session drops mid-call.
pub struct MCPClient {
    transport: Box<dyn MCPTransport>,
    session: Option<MCPRunningService>,
    state: MCPConnectionState,
}

impl MCPClient {
    /// Create a new MCP client with the given transport.
    pub fn new(transport: Box<dyn MCPTransport>) -> Self {
        Self {
            transport,
            session: None,
            state: MCPConnectionState::Disconnected,
        }
    }

    pub fn connection_state(&self) -> MCPConnectionState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state == MCPConnectionState::Initialized
    }

    /// Initialize the MCP connection.
    pub async fn initialize(&mut self) -> Result<(), ConciergeError> {
        if self.state == MCPConnectionState::Closed {
            return Err(closed_error());
        }
        if let Some(session) = self.session.as_ref() {
            if !session.is_closed() {
                self.state = MCPConnectionState::Initialized;
                return Ok(());
            }
            self.session = None;
            self.state = MCPConnectionState::Disconnected;
        }

        let session = self.connect_with_protocol_fallback().await?;
        tracing::info!(endpoint = self.transport.endpoint(), "MCP session established");
        self.session = Some(session);
        self.state = MCPConnectionState::Initialized;
        Ok(())
    }

    /// List available tools from the MCP server.
    pub async fn list_tools(&mut self) -> Result<Vec<MCPToolSchema>, ConciergeError> {
        self.ensure_initialized()?;

        let tools = match self.list_tools_from_active_session().await {
            Ok(tools) => tools,
            Err(error) if should_reconnect_after_service_error(&error) => {
                self.reconnect().await?;
                self.list_tools_from_active_session()
                    .await
                    .map_err(|retry_error| map_service_error("list_tools", retry_error))?
            }
            Err(error) => return Err(map_service_error("list_tools", error)),
        };

        Ok(tools.into_iter().map(map_mcp_tool_schema).collect())
    }

    /// Execute a tool on the MCP server.
    pub async fn call_tool(
        &mut self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<MCPToolCallResult, ConciergeError> {
        self.ensure_initialized()?;
        let arguments = coerce_tool_arguments(arguments)?;

        let result = match self
            .call_tool_from_active_session(name, arguments.clone())
            .await
        {
            Ok(result) => result,
            Err(error) if should_reconnect_after_service_error(&error) => {
                self.reconnect().await?;
                self.call_tool_from_active_session(name, arguments)
                    .await
                    .map_err(|retry_error| map_service_error("call_tool", retry_error))?
            }
            Err(error) => return Err(map_service_error("call_tool", error)),
        };

        map_call_result(name, result)
    }

    /// Close the session. Further calls fail.
    pub async fn close(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(error) = session.cancel().await {
                tracing::debug!(%error, "MCP session cancel failed");
            }
        }
        self.state = MCPConnectionState::Closed;
    }

    fn ensure_initialized(&self) -> Result<(), ConciergeError> {
        match self.state {
            MCPConnectionState::Initialized => Ok(()),
            MCPConnectionState::Closed => Err(closed_error()),
            MCPConnectionState::Disconnected => Err(ConciergeError::InvalidState(
                "MCP client must be initialized first".into(),
            )),
        }
    }

    async fn reconnect(&mut self) -> Result<(), ConciergeError> {
        tracing::warn!(endpoint = self.transport.endpoint(), "MCP session dropped; reconnecting");
        self.session = None;
        self.state = MCPConnectionState::Disconnected;
        self.initialize().await
    }

    async fn connect_with_protocol_fallback(
        &mut self,
    ) -> Result<MCPRunningService, ConciergeError> {
        let latest_client_info = rmcp::model::ClientInfo {
            protocol_version: ProtocolVersion::LATEST,
            ..Default::default()
        };

        match self.transport.connect(latest_client_info).await {
            Ok(session) => return Ok(session),
            Err(error) if should_retry_protocol_fallback(&error) => {}
            Err(error) => return Err(map_client_initialize_error(error)),
        }

        let fallback_client_info = rmcp::model::ClientInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            ..Default::default()
        };
        self.transport
            .connect(fallback_client_info)
            .await
            .map_err(map_client_initialize_error)
    }

    async fn list_tools_from_active_session(
        &mut self,
    ) -> Result<Vec<rmcp::model::Tool>, ServiceError> {
        let session = self.session.as_mut().ok_or(ServiceError::TransportClosed)?;

        match session.list_all_tools().await {
            Ok(tools) => Ok(tools),
            Err(ServiceError::UnexpectedResponse) => {
                session.list_tools(None).await.map(|page| page.tools)
            }
            Err(error) => Err(error),
        }
    }

    async fn call_tool_from_active_session(
        &mut self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ServiceError> {
        let session = self.session.as_mut().ok_or(ServiceError::TransportClosed)?;

        session
            .call_tool(CallToolRequestParams {
                meta: None,
                name: name.to_owned().into(),
                arguments,
                task: None,
            })
            .await
    }
}

fn closed_error() -> ConciergeError {
    ConciergeError::Provider {
        provider: "mcp".into(),
        message: "MCP session is closed".into(),
    }
}

fn should_reconnect_after_service_error(error: &ServiceError) -> bool {
    matches!(
        error,
        ServiceError::TransportClosed | ServiceError::TransportSend(_)
    )
}

fn should_retry_protocol_fallback(error: &ClientInitializeError) -> bool {
    match error {
        ClientInitializeError::JsonRpcError(error) => {
            let message = error.message.to_ascii_lowercase();
            message.contains("protocol") && message.contains("version")
        }
        _ => false,
    }
}

fn map_mcp_tool_schema(tool: rmcp::model::Tool) -> MCPToolSchema {
    MCPToolSchema {
        name: tool.name.to_string(),
        description: tool.description.map(|d| d.to_string()),
        input_schema: serde_json::Value::Object((*tool.input_schema).clone()),
    }
}

fn coerce_tool_arguments(value: serde_json::Value) -> Result<Option<JsonObject>, ConciergeError> {
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Object(map) => Ok(Some(map)),
        serde_json::Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            let parsed: serde_json::Value = serde_json::from_str(trimmed).map_err(|e| {
                ConciergeError::InvalidArgument(format!("MCP tool arguments must be valid JSON: {e}"))
            })?;
            coerce_tool_arguments(parsed)
        }
        other => Err(ConciergeError::InvalidArgument(format!(
            "MCP tool arguments must be a JSON object; got {other}"
        ))),
    }
}

fn extract_text_content(content: &[Content]) -> Option<String> {
    let mut lines = Vec::new();
    for item in content {
        if let Some(text) = item.as_text() {
            lines.push(text.text.clone());
            continue;
        }
        if let Some(resource) = item.as_resource() {
            if let ResourceContents::TextResourceContents { text, .. } = &resource.resource {
                lines.push(text.clone());
            }
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn map_call_result(
    name: &str,
    result: CallToolResult,
) -> Result<MCPToolCallResult, ConciergeError> {
    let text_content = extract_text_content(&result.content);
    let content = result
        .content
        .iter()
        .filter_map(|item| serde_json::to_value(item).ok())
        .collect::<Vec<_>>();

    if result.is_error.unwrap_or(false) {
        let message = result
            .structured_content
            .as_ref()
            .map(|v| v.to_string())
            .or_else(|| text_content.clone())
            .unwrap_or_else(|| "MCP tool returned an error result".into());

        return Err(ConciergeError::tool(name, message));
    }

    Ok(MCPToolCallResult {
        structured_content: result.structured_content,
        text_content,
        content,
    })
}

fn map_client_initialize_error(error: ClientInitializeError) -> ConciergeError {
    let message = match error {
        ClientInitializeError::ConnectionClosed(context) => {
            format!("MCP initialize connection closed: {context}")
        }
        ClientInitializeError::TransportError { error, context } => {
            format!("MCP initialize transport error ({context}): {error}")
        }
        ClientInitializeError::JsonRpcError(error) => format!(
            "MCP initialize JSON-RPC error {}: {}",
            error.code.0, error.message
        ),
        ClientInitializeError::Cancelled => "MCP initialize cancelled".to_string(),
        other => format!("MCP initialize error: {other}"),
    };
    ConciergeError::Provider {
        provider: "mcp".into(),
        message,
    }
}

fn map_service_error(context: &str, error: ServiceError) -> ConciergeError {
    let message = match error {
        ServiceError::Timeout { timeout } => {
            return ConciergeError::Timeout(timeout.as_millis() as u64)
        }
        ServiceError::McpError(error) => {
            format!("{context}: MCP error {}: {}", error.code.0, error.message)
        }
        ServiceError::TransportSend(error) => {
            format!("{context}: MCP transport send failed: {error}")
        }
        ServiceError::TransportClosed => format!("{context}: MCP transport closed"),
        ServiceError::UnexpectedResponse => format!("{context}: unexpected MCP response"),
        ServiceError::Cancelled { reason } => {
            let suffix = reason
                .as_deref()
                .map(|r| format!(" ({r})"))
                .unwrap_or_default();
            format!("{context}: MCP request cancelled{suffix}")
        }
        other => format!("{context}: MCP service error: {other}"),
    };
    ConciergeError::Provider {
        provider: "mcp".into(),
        message,
    }
}
