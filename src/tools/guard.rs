//! Failure-as-text wrapper for tools handed to a model.

use std::sync::Arc;

use async_trait::async_trait;

use super::arguments::ToolArguments;
use super::tool::{Tool, ToolExecutionContext};
use super::types::AgentToolParameters;
use crate::error::ConciergeError;

/// Wraps a tool so that every failure reaches the model as a readable
/// string (`"{prefix}: {error}"`) instead of an error result.
pub struct GuardedTool {
    inner: Arc<dyn Tool>,
    failure_prefix: String,
}

impl GuardedTool {
    pub fn new(inner: Arc<dyn Tool>, failure_prefix: impl Into<String>) -> Self {
        Self {
            inner,
            failure_prefix: failure_prefix.into(),
        }
    }

    /// Render an error with this guard's prefix.
    pub fn describe_failure(&self, error: &ConciergeError) -> String {
        format!("{}: {}", self.failure_prefix, error)
    }
}

#[async_trait]
impl Tool for GuardedTool {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn description(&self) -> &str {
        self.inner.description()
    }

    fn parameters(&self) -> &AgentToolParameters {
        self.inner.parameters()
    }

    async fn execute(
        &self,
        args: &ToolArguments,
        ctx: &ToolExecutionContext,
    ) -> Result<serde_json::Value, ConciergeError> {
        match self.inner.execute(args, ctx).await {
            Ok(value) => Ok(value),
            Err(error) => {
                tracing::warn!(tool = self.inner.name(), %error, "tool failed; reporting as text");
                Ok(serde_json::Value::String(self.describe_failure(&error)))
            }
        }
    }
}

impl std::fmt::Debug for GuardedTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardedTool")
            .field("name", &self.inner.name())
            .field("failure_prefix", &self.failure_prefix)
            .finish()
    }
}
