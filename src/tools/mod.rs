//! Tool system for function calling.

pub mod arguments;
pub mod dynamic;
pub mod guard;
pub mod tool;
pub mod types;
pub mod validation;

pub use arguments::ToolArguments;
pub use dynamic::{DynamicTool, DynamicToolAdapter, DynamicToolProvider};
pub use guard::GuardedTool;
pub use tool::{AgentTool, Tool, ToolExecutionContext};
pub use types::AgentToolParameters;
pub use validation::validate_arguments;
