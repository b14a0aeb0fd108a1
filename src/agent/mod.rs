//! Agent system: multi-turn conversations with tool execution.

pub mod agent;
pub mod conversation;
pub mod session;

pub use agent::{Agent, SubAgent};
pub use conversation::Conversation;
pub use session::AgentSessionManager;
