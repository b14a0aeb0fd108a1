//! Wedding planner: per-thread coordinator sessions over shared specialists.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::agent::Agent;
use crate::config::ConciergeConfig;
use crate::error::ConciergeError;
use crate::prompts;
use crate::provider::{create_provider, ModelProvider};
use crate::types::GenerateTextResult;

use super::specialists::Specialists;
use super::state::{shared_state, SharedState, WeddingState};
use super::tools::coordinator_tools;

/// One coordinator conversation and the state its tools mutate.
struct PlannerSession {
    state: SharedState,
    coordinator: Agent,
    turn: tokio::sync::Mutex<()>,
}

/// Wedding coordinator.
///
/// Each thread id gets its own [`SharedState`] and coordinator agent; the
/// specialists are shared across threads.
pub struct WeddingPlanner {
    provider: Arc<dyn ModelProvider>,
    specialists: Arc<Specialists>,
    max_tool_iterations: usize,
    sessions: Mutex<HashMap<String, Arc<PlannerSession>>>,
}

impl WeddingPlanner {
    pub fn new(provider: Arc<dyn ModelProvider>, specialists: Specialists) -> Self {
        Self {
            provider,
            specialists: Arc::new(specialists),
            max_tool_iterations: crate::config::DEFAULT_MAX_TOOL_ITERATIONS,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_max_tool_iterations(mut self, max_tool_iterations: usize) -> Self {
        self.max_tool_iterations = max_tool_iterations;
        self
    }

    /// Wire the model, Tavily, the flight MCP server and the music DB from config.
    pub fn from_config(config: &ConciergeConfig) -> Result<Self, ConciergeError> {
        use super::specialists::{playlist_agent, travel_agent, venue_agent};
        use crate::integrations::{PlaylistDb, TavilyClient};

        let provider = create_provider(&config.language_model()?, config)?;
        let tavily = Arc::new(TavilyClient::from_config(config)?);
        let db = Arc::new(PlaylistDb::open(&config.playlist_db_path)?);
        let flights = flight_backend(config)?;

        let iterations = config.max_tool_iterations;
        let specialists = Specialists::new(
            Arc::new(travel_agent(provider.clone(), flights).with_max_iterations(iterations)),
            Arc::new(venue_agent(provider.clone(), tavily).with_max_iterations(iterations)),
            Arc::new(playlist_agent(provider.clone(), db).with_max_iterations(iterations)),
        )
        .with_timeout(config.delegation_timeout());

        Ok(Self::new(provider, specialists).with_max_tool_iterations(iterations))
    }

    pub fn specialists(&self) -> &Specialists {
        &self.specialists
    }

    fn session(&self, thread_id: &str) -> Result<Arc<PlannerSession>, ConciergeError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| ConciergeError::InvalidState("planner sessions poisoned".into()))?;
        let session = sessions.entry(thread_id.to_string()).or_insert_with(|| {
            tracing::debug!(thread_id, "new planner session");
            let state = shared_state(WeddingState::default());
            let coordinator = Agent::new("coordinator", self.provider.clone())
                .with_system_prompt(prompts::COORDINATOR)
                .with_tools(coordinator_tools(&state, &self.specialists))
                .with_max_iterations(self.max_tool_iterations);
            Arc::new(PlannerSession {
                state,
                coordinator,
                turn: tokio::sync::Mutex::new(()),
            })
        });
        Ok(session.clone())
    }

    /// Run one coordinator turn on `thread_id` and return the full result.
    pub async fn plan_detailed(
        &self,
        thread_id: &str,
        message: &str,
    ) -> Result<GenerateTextResult, ConciergeError> {
        let session = self.session(thread_id)?;
        let _turn = session.turn.lock().await;
        let snapshot = session.state.read().await.clone();
        tracing::info!(thread_id, "coordinator turn");
        match session.coordinator.run_turn(thread_id, message).await {
            Ok(result) => Ok(result),
            Err(e) => {
                // The turn's messages are dropped, so its state writes go too.
                *session.state.write().await = snapshot;
                tracing::warn!(thread_id, error = %e, "coordinator turn failed, state restored");
                Err(e)
            }
        }
    }

    /// Run one coordinator turn on `thread_id` and return the reply text.
    pub async fn plan(&self, thread_id: &str, message: &str) -> Result<String, ConciergeError> {
        Ok(self.plan_detailed(thread_id, message).await?.text)
    }

    /// Drop a thread's state and coordinator history.
    ///
    /// Returns `false` when the thread was unknown.
    pub fn forget(&self, thread_id: &str) -> bool {
        let removed = match self.sessions.lock() {
            Ok(mut sessions) => sessions.remove(thread_id),
            Err(_) => None,
        };
        match removed {
            Some(session) => {
                session.coordinator.clear_history(thread_id);
                tracing::debug!(thread_id, "planner session forgotten");
                true
            }
            None => false,
        }
    }

    /// Current state of a thread, if the thread exists.
    pub async fn state(&self, thread_id: &str) -> Option<WeddingState> {
        let session = self.sessions.lock().ok()?.get(thread_id).cloned()?;
        let state = session.state.read().await.clone();
        Some(state)
    }

    /// Run all three delegations concurrently for a known state.
    pub async fn plan_direct(&self, state: &WeddingState) -> PlanReport {
        tracing::info!(%state, "direct plan");
        let (flights, venues, playlist) = futures::join!(
            self.specialists.search_flights(state),
            self.specialists.search_venue(state),
            self.specialists.suggest_playlist(state),
        );
        PlanReport {
            flights,
            venues,
            playlist,
        }
    }
}

#[cfg(feature = "mcp")]
fn flight_backend(
    config: &ConciergeConfig,
) -> Result<crate::integrations::FlightSearch, ConciergeError> {
    Ok(crate::integrations::FlightSearch::mcp(
        config.flights_mcp_url.clone(),
    ))
}

#[cfg(not(feature = "mcp"))]
fn flight_backend(
    _config: &ConciergeConfig,
) -> Result<crate::integrations::FlightSearch, ConciergeError> {
    Err(ConciergeError::Configuration(
        "flight search needs the `mcp` feature".into(),
    ))
}

impl fmt::Debug for WeddingPlanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeddingPlanner")
            .field("model", &self.provider.model_id())
            .field("specialists", &self.specialists)
            .field("max_tool_iterations", &self.max_tool_iterations)
            .finish()
    }
}

/// Output of [`WeddingPlanner::plan_direct`]: one text per specialist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanReport {
    pub flights: String,
    pub venues: String,
    pub playlist: String,
}

impl fmt::Display for PlanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Flights\n\n{}\n", self.flights.trim())?;
        writeln!(f, "## Venues\n\n{}\n", self.venues.trim())?;
        write!(f, "## Playlist\n\n{}", self.playlist.trim())
    }
}
