//! Wedding planner: coordinator, session state, specialists.

pub mod coordinator;
pub mod specialists;
pub mod state;
pub mod tools;

pub use coordinator::{PlanReport, WeddingPlanner};
pub use specialists::Specialists;
pub use state::{
    shared_state, update_state, MissingFields, SharedState, StateField, StateUpdate,
    WeddingState, STATE_UPDATED,
};
