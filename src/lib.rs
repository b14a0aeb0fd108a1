//! Concierge: local-model assistants built on a small agent SDK.
//!
//! Two assistants ship with the crate:
//!
//! - [`chef::ChefAssistant`], a single agent with web search.
//! - [`planner::WeddingPlanner`], a coordinator that records what the user
//!   tells it in a per-thread [`planner::WeddingState`] and delegates to
//!   flight, venue and playlist specialists once the fields they need are set.
//!
//! # Quick Start
//!
//! ```no_run
//! use concierge::prelude::*;
//!
//! # async fn example() -> concierge::error::Result<()> {
//! let config = ConciergeConfig::load(None)?;
//! let planner = WeddingPlanner::from_config(&config)?;
//! let reply = planner
//!     .plan("thread-1", "We fly from Lima to Rome, 80 guests, we love jazz")
//!     .await?;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod chef;
pub mod config;
pub mod error;
pub mod generation;
pub mod integrations;
pub mod models;
pub mod planner;
pub mod prelude;
pub mod prompts;
pub mod provider;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "mcp")]
pub mod mcp;

#[cfg(feature = "cli")]
pub mod cli;
