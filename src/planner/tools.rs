//! Coordinator tools. Each closes over one session's state.

use std::sync::Arc;

use crate::error::ConciergeError;
use crate::tools::{AgentTool, AgentToolParameters, Tool, ToolArguments};

use super::specialists::Specialists;
use super::state::{update_state, SharedState, StateUpdate, WeddingState};

pub const UPDATE_STATE: &str = "update_state";
pub const SEARCH_FLIGHTS: &str = "search_flights";
pub const SEARCH_VENUE: &str = "search_venue";
pub const SUGGEST_PLAYLIST: &str = "suggest_playlist";

fn state_update_from(args: &ToolArguments) -> Result<StateUpdate, ConciergeError> {
    Ok(StateUpdate {
        origin: args.get_text("origin")?,
        destination: args.get_text("destination")?,
        guest_count: args.get_text("guest_count")?,
        music_genre: args.get_text("music_genre")?,
    })
}

/// `update_state(origin, destination, guest_count, music_genre)`.
pub fn update_state_tool(state: SharedState) -> Arc<dyn Tool> {
    let params = AgentToolParameters::object()
        .string("origin", "Country or city the guests travel from", true)
        .string("destination", "Country or city where the wedding takes place", true)
        .string_or_integer("guest_count", "Number of guests", true)
        .string("music_genre", "Music genre for the playlist", true)
        .build();
    Arc::new(AgentTool::text(
        UPDATE_STATE,
        "Record the wedding details in the session state. Overwrites all four fields",
        params,
        move |args, _ctx| {
            let state = state.clone();
            async move {
                let update = state_update_from(&args)?;
                Ok(update_state(&state, update).await.to_string())
            }
        },
    ))
}

async fn snapshot(state: &SharedState) -> WeddingState {
    state.read().await.clone()
}

/// `search_flights()`: delegates to the travel agent.
pub fn search_flights_tool(state: SharedState, specialists: Arc<Specialists>) -> Arc<dyn Tool> {
    Arc::new(AgentTool::text(
        SEARCH_FLIGHTS,
        "Search flights to the wedding destination for the recorded guests",
        AgentToolParameters::empty(),
        move |_args, _ctx| {
            let state = state.clone();
            let specialists = specialists.clone();
            async move { Ok(specialists.search_flights(&snapshot(&state).await).await) }
        },
    ))
}

/// `search_venue()`: delegates to the venue agent.
pub fn search_venue_tool(state: SharedState, specialists: Arc<Specialists>) -> Arc<dyn Tool> {
    Arc::new(AgentTool::text(
        SEARCH_VENUE,
        "Search places where the wedding can be held",
        AgentToolParameters::empty(),
        move |_args, _ctx| {
            let state = state.clone();
            let specialists = specialists.clone();
            async move { Ok(specialists.search_venue(&snapshot(&state).await).await) }
        },
    ))
}

/// `suggest_playlist()`: delegates to the playlist agent.
pub fn suggest_playlist_tool(state: SharedState, specialists: Arc<Specialists>) -> Arc<dyn Tool> {
    Arc::new(AgentTool::text(
        SUGGEST_PLAYLIST,
        "Build a music playlist for the wedding",
        AgentToolParameters::empty(),
        move |_args, _ctx| {
            let state = state.clone();
            let specialists = specialists.clone();
            async move { Ok(specialists.suggest_playlist(&snapshot(&state).await).await) }
        },
    ))
}

/// All four coordinator tools for one session.
pub fn coordinator_tools(state: &SharedState, specialists: &Arc<Specialists>) -> Vec<Arc<dyn Tool>> {
    vec![
        update_state_tool(state.clone()),
        search_flights_tool(state.clone(), specialists.clone()),
        search_venue_tool(state.clone(), specialists.clone()),
        suggest_playlist_tool(state.clone(), specialists.clone()),
    ]
}
