//! Flight search through a remote MCP tool server.

use std::sync::Arc;

use crate::error::ConciergeError;
use crate::tools::{
    AgentTool, AgentToolParameters, DynamicToolAdapter, DynamicToolProvider, GuardedTool, Tool,
    ToolArguments, ToolExecutionContext,
};

pub const FLIGHT_SEARCH_TOOL: &str = "flight_search";
pub const FLIGHT_SEARCH_FAILURE: &str = "Error searching flights";
/// Name of the tool the remote server is expected to expose.
pub const REMOTE_SEARCH_FLIGHTS: &str = "search_flights";

/// Parameters for one flight search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightQuery {
    pub origin: String,
    pub destination: String,
    pub passengers: u32,
}

impl FlightQuery {
    fn to_arguments(&self) -> serde_json::Value {
        serde_json::json!({
            "origin": self.origin,
            "destination": self.destination,
            "passengers": self.passengers,
        })
    }
}

/// What a flight search produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlightSearchOutcome {
    /// The remote tool answered; payload rendered as text.
    Found(String),
    /// The server is reachable but has no `search_flights` tool.
    ToolNotExposed,
}

impl FlightSearchOutcome {
    /// Text handed back to the model.
    pub fn into_message(self) -> String {
        match self {
            Self::Found(result) => format!("Flight results found:\n{result}"),
            Self::ToolNotExposed => {
                format!("The flight server does not expose the {REMOTE_SEARCH_FLIGHTS} tool.")
            }
        }
    }
}

/// Looks up `search_flights` on a dynamic tool provider and calls it.
#[derive(Clone)]
pub struct FlightSearch {
    provider: Arc<dyn DynamicToolProvider>,
}

impl FlightSearch {
    pub fn new(provider: Arc<dyn DynamicToolProvider>) -> Self {
        Self { provider }
    }

    /// Backed by the MCP server at `url` (streamable HTTP).
    #[cfg(feature = "mcp")]
    pub fn mcp(url: impl Into<String>) -> Self {
        Self::new(Arc::new(crate::mcp::MCPToolAdapter::streamable_http(url)))
    }

    pub async fn search(&self, query: &FlightQuery) -> Result<FlightSearchOutcome, ConciergeError> {
        let Some(remote) =
            DynamicToolAdapter::resolve(self.provider.clone(), REMOTE_SEARCH_FLIGHTS).await?
        else {
            tracing::warn!("remote flight server does not expose {REMOTE_SEARCH_FLIGHTS}");
            return Ok(FlightSearchOutcome::ToolNotExposed);
        };

        tracing::info!(
            origin = %query.origin,
            destination = %query.destination,
            passengers = query.passengers,
            "searching flights"
        );
        let result = remote
            .execute(
                &ToolArguments::new(query.to_arguments()),
                &ToolExecutionContext::default(),
            )
            .await?;
        let text = match result {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        };
        Ok(FlightSearchOutcome::Found(text))
    }
}

/// Parse a passenger count: a positive integer, given as a number or text.
pub fn parse_passengers(raw: &str) -> Result<u32, ConciergeError> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConciergeError::InvalidArgument(format!(
            "passenger count must be a positive integer, got '{raw}'"
        ))),
    }
}

/// `flight_search(origin, destination, passengers)` for the travel agent.
pub fn flight_search_tool(search: FlightSearch) -> Arc<dyn Tool> {
    let params = AgentToolParameters::object()
        .string("origin", "City and country the guests depart from", true)
        .string("destination", "City and country of the wedding", true)
        .integer("passengers", "Number of passengers", true)
        .build();
    let search = Arc::new(search);
    let inner = AgentTool::text(
        FLIGHT_SEARCH_TOOL,
        "Search flights to the wedding destination through the remote flight server",
        params,
        move |args, _ctx| {
            let search = search.clone();
            async move {
                let query = FlightQuery {
                    origin: args.get_str("origin")?.to_string(),
                    destination: args.get_str("destination")?.to_string(),
                    passengers: parse_passengers(&args.get_text("passengers")?)?,
                };
                Ok(search.search(&query).await?.into_message())
            }
        },
    );
    Arc::new(GuardedTool::new(Arc::new(inner), FLIGHT_SEARCH_FAILURE))
}
