//! Text generation with tool loop.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::DEFAULT_MAX_TOOL_ITERATIONS;
use crate::error::ConciergeError;
use crate::provider::{ModelProvider, ProviderRequest, ToolDefinition};
use crate::tools::arguments::ToolArguments;
use crate::tools::tool::{Tool, ToolExecutionContext};
use crate::tools::validate_arguments;
use crate::types::*;
use crate::util::retry::RetryPolicy;

/// Knobs for one tool loop run.
#[derive(Debug, Clone)]
pub struct ToolLoopOptions {
    /// Upper bound on model calls before giving up with `FinishReason::Length`.
    pub max_iterations: usize,
    /// Retry applied to each provider call.
    pub retry: RetryPolicy,
    /// Thread id handed to tools via [`ToolExecutionContext`].
    pub thread_id: Option<String>,
}

impl Default for ToolLoopOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_TOOL_ITERATIONS,
            retry: RetryPolicy::default(),
            thread_id: None,
        }
    }
}

/// Tool definitions advertised to the provider, `None` when there are no tools.
pub fn tool_definitions(tools: &[Arc<dyn Tool>]) -> Option<Vec<ToolDefinition>> {
    if tools.is_empty() {
        return None;
    }
    Some(
        tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters().schema.clone(),
            })
            .collect(),
    )
}

/// Generate text with an optional tool loop.
///
/// If the model returns tool calls, they are executed and fed back
/// until the model produces a final text response or the iteration limit is hit.
/// Tool failures never abort the loop; they are returned to the model as
/// error results.
pub async fn generate_text(
    provider: &dyn ModelProvider,
    mut messages: Vec<ModelMessage>,
    settings: GenerationSettings,
    tools: &[Arc<dyn Tool>],
    options: &ToolLoopOptions,
) -> Result<GenerateTextResult, ConciergeError> {
    let tool_defs = tool_definitions(tools);

    let mut steps = Vec::new();
    let mut total_usage = Usage::default();

    for iteration in 0..options.max_iterations.max(1) {
        let request = ProviderRequest {
            messages: messages.clone(),
            settings: settings.clone(),
            tools: tool_defs.clone(),
        };

        debug!(
            iteration,
            provider = provider.provider_name(),
            "generate_text: calling provider"
        );
        let response = options
            .retry
            .execute(|| provider.generate_text(&request))
            .await?;

        total_usage.merge(&response.usage);

        let mut step = GenerationStep {
            text: response.text.clone(),
            tool_calls: response.tool_calls.clone(),
            tool_results: Vec::new(),
            usage: response.usage.clone(),
            finish_reason: response.finish_reason,
        };

        if response.tool_calls.is_empty() {
            messages.push(ModelMessage::assistant(response.text.clone()));
            steps.push(step);
            return Ok(GenerateTextResult {
                text: response.text,
                steps,
                messages,
                usage: total_usage,
                finish_reason: response.finish_reason,
            });
        }

        messages.push(ModelMessage::assistant_tool_calls(
            response.text.clone(),
            &response.tool_calls,
        ));

        for tc in &response.tool_calls {
            let ctx = ToolExecutionContext {
                tool_call_id: Some(tc.id.clone()),
                thread_id: options.thread_id.clone(),
            };
            let result = execute_tool_call(tools, tc, &ctx).await;
            step.tool_results.push(result.clone());
            messages.push(ModelMessage::tool_result(
                result.tool_call_id,
                result.result,
                result.is_error,
            ));
        }

        steps.push(step);
    }

    warn!(
        max_iterations = options.max_iterations,
        "generate_text: tool loop hit iteration limit"
    );
    let text = steps
        .last()
        .map(|s| s.text.clone())
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| iteration_limit_message(options.max_iterations));
    Ok(GenerateTextResult {
        text,
        steps,
        messages,
        usage: total_usage,
        finish_reason: Some(FinishReason::Length),
    })
}

/// Reply used when the loop runs out of iterations before the model answers.
pub fn iteration_limit_message(max_iterations: usize) -> String {
    format!("Stopped after {max_iterations} tool iterations without a final answer.")
}

async fn execute_tool_call(
    tools: &[Arc<dyn Tool>],
    tc: &AgentToolCall,
    ctx: &ToolExecutionContext,
) -> AgentToolResult {
    let failure = |message: String| AgentToolResult {
        tool_call_id: tc.id.clone(),
        result: serde_json::json!({ "error": message }),
        is_error: true,
    };

    let Some(tool) = tools.iter().find(|t| t.name() == tc.name) else {
        warn!(tool = %tc.name, "Tool not found");
        return failure(format!("Tool '{}' not found", tc.name));
    };

    let args = ToolArguments::new(tc.arguments.clone());
    if let Err(reason) = validate_arguments(args.raw(), &tool.parameters().schema) {
        warn!(tool = %tc.name, %reason, "Rejected tool arguments");
        return failure(format!("Invalid arguments for '{}': {reason}", tc.name));
    }

    match tool.execute(&args, ctx).await {
        Ok(value) => AgentToolResult {
            tool_call_id: tc.id.clone(),
            result: value,
            is_error: false,
        },
        Err(e) => {
            warn!(tool = %tc.name, error = %e, "Tool execution failed");
            failure(e.to_string())
        }
    }
}
