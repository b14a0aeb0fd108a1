//! Generation result types.

use super::generation::FinishReason;
use super::message::{AgentToolCall, AgentToolResult, ModelMessage};
use super::usage::Usage;

/// Result of a text generation call.
#[derive(Debug, Clone)]
pub struct GenerateTextResult {
    /// Final generated text.
    pub text: String,
    /// All generation steps (multi-step if tools were used).
    pub steps: Vec<GenerationStep>,
    /// Full message history including tool interactions.
    pub messages: Vec<ModelMessage>,
    /// Aggregated usage across all steps.
    pub usage: Usage,
    /// Why the final step finished.
    pub finish_reason: Option<FinishReason>,
}

impl GenerateTextResult {
    /// Names of every tool the model called, in call order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.steps
            .iter()
            .flat_map(|step| step.tool_calls.iter().map(|call| call.name.as_str()))
            .collect()
    }
}

/// A single generation step (one model call).
#[derive(Debug, Clone)]
pub struct GenerationStep {
    pub text: String,
    pub tool_calls: Vec<AgentToolCall>,
    pub tool_results: Vec<AgentToolResult>,
    pub usage: Usage,
    pub finish_reason: Option<FinishReason>,
}
