//! Tool adapters over external services: web search, flights, music DB.
//!
//! Every adapter is wrapped in a [`GuardedTool`](crate::tools::GuardedTool),
//! so failures reach the model as text.

pub mod flights;
pub mod playlist_db;
pub mod tavily;

pub use flights::{flight_search_tool, FlightQuery, FlightSearch, FlightSearchOutcome};
pub use playlist_db::{query_playlist_db_tool, PlaylistDb};
pub use tavily::{web_search_tool, SearchResponse, SearchResult, TavilyClient};
