//! The three specialists and the delegations that gate on session state.

use std::sync::Arc;
use std::time::Duration;

use crate::agent::{Agent, SubAgent};
use crate::integrations::flights::{flight_search_tool, parse_passengers, FlightSearch};
use crate::integrations::playlist_db::{query_playlist_db_tool, PlaylistDb};
use crate::integrations::tavily::{web_search_tool, TavilyClient};
use crate::prompts;
use crate::provider::ModelProvider;
use crate::util::timeout::with_optional_timeout;

use super::state::{StateField, WeddingState};

pub const FLIGHT_FIELDS: [StateField; 3] = [
    StateField::Origin,
    StateField::Destination,
    StateField::GuestCount,
];
pub const VENUE_FIELDS: [StateField; 2] = [StateField::Destination, StateField::GuestCount];
pub const PLAYLIST_FIELDS: [StateField; 1] = [StateField::MusicGenre];

/// Travel, venue and playlist sub-agents plus the delegation timeout.
#[derive(Clone)]
pub struct Specialists {
    travel: Arc<dyn SubAgent>,
    venue: Arc<dyn SubAgent>,
    playlist: Arc<dyn SubAgent>,
    timeout: Option<Duration>,
}

impl Specialists {
    pub fn new(
        travel: Arc<dyn SubAgent>,
        venue: Arc<dyn SubAgent>,
        playlist: Arc<dyn SubAgent>,
    ) -> Self {
        Self {
            travel,
            venue,
            playlist,
            timeout: None,
        }
    }

    /// Bound each delegation; a timed-out delegation returns a failure string.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Flights for the wedding. Needs origin, destination and guest_count.
    pub async fn search_flights(&self, state: &WeddingState) -> String {
        if let Err(missing) = state.require(&FLIGHT_FIELDS) {
            return format!("Cannot search flights yet. {}", capitalize(&missing.to_string()));
        }
        let (Some(origin), Some(destination), Some(guests)) = (
            state.get(StateField::Origin),
            state.get(StateField::Destination),
            state.get(StateField::GuestCount),
        ) else {
            return "Cannot search flights yet.".to_string();
        };
        let passengers = match parse_passengers(guests) {
            Ok(n) => n,
            Err(e) => return format!("Cannot search flights: {e}"),
        };
        let request = format!(
            "Find flights from {origin} to {destination} for {passengers} passengers \
             travelling to a wedding."
        );
        self.delegate(self.travel.as_ref(), &request).await
    }

    /// Venues at the destination. Needs destination and guest_count.
    pub async fn search_venue(&self, state: &WeddingState) -> String {
        if let Err(missing) = state.require(&VENUE_FIELDS) {
            return format!("Cannot search venues yet. {}", capitalize(&missing.to_string()));
        }
        let (Some(destination), Some(guests)) = (
            state.get(StateField::Destination),
            state.get(StateField::GuestCount),
        ) else {
            return "Cannot search venues yet.".to_string();
        };
        let request = format!("Find wedding venues in {destination} for {guests} people");
        self.delegate(self.venue.as_ref(), &request).await
    }

    /// Playlist in the requested genre. Needs music_genre.
    pub async fn suggest_playlist(&self, state: &WeddingState) -> String {
        if let Err(missing) = state.require(&PLAYLIST_FIELDS) {
            return format!("Cannot build a playlist yet. {}", capitalize(&missing.to_string()));
        }
        let Some(genre) = state.get(StateField::MusicGenre) else {
            return "Cannot build a playlist yet.".to_string();
        };
        let request = format!("Find songs of the {genre} genre for the wedding playlist");
        self.delegate(self.playlist.as_ref(), &request).await
    }

    async fn delegate(&self, agent: &dyn SubAgent, request: &str) -> String {
        tracing::info!(agent = agent.name(), request, "delegating");
        match with_optional_timeout(self.timeout, agent.invoke(request)).await {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(agent = agent.name(), %error, "delegation failed");
                format!("Error from the {} agent: {error}", agent.name())
            }
        }
    }
}

impl std::fmt::Debug for Specialists {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Specialists")
            .field("travel", &self.travel.name())
            .field("venue", &self.venue.name())
            .field("playlist", &self.playlist.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Travel agent: flight_search over the remote flight server.
pub fn travel_agent(provider: Arc<dyn ModelProvider>, flights: FlightSearch) -> Agent {
    Agent::new("travel", provider)
        .with_system_prompt(prompts::TRAVEL)
        .with_tool(flight_search_tool(flights))
}

/// Venue agent: web_search only.
pub fn venue_agent(provider: Arc<dyn ModelProvider>, tavily: Arc<TavilyClient>) -> Agent {
    Agent::new("venue", provider)
        .with_system_prompt(prompts::VENUE)
        .with_tool(web_search_tool(tavily))
}

/// Playlist agent: query_playlist_db only.
pub fn playlist_agent(provider: Arc<dyn ModelProvider>, db: Arc<PlaylistDb>) -> Agent {
    Agent::new("playlist", provider)
        .with_system_prompt(prompts::PLAYLIST)
        .with_tool(query_playlist_db_tool(db))
}
