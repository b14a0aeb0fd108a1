//! Convenience re-exports for common use.

pub use crate::agent::{Agent, SubAgent};
pub use crate::chef::ChefAssistant;
pub use crate::config::ConciergeConfig;
pub use crate::error::{ConciergeError, Result};
pub use crate::models::LanguageModel;
pub use crate::planner::{PlanReport, StateField, StateUpdate, WeddingPlanner, WeddingState};
pub use crate::provider::ModelProvider;
pub use crate::tools::{AgentTool, AgentToolParameters, Tool, ToolArguments};
pub use crate::types::{
    ContentPart, FinishReason, GenerateTextResult, GenerationSettings, ModelMessage, Role, Usage,
};
