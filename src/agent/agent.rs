//! Core Agent struct and the sub-agent seam.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::ConciergeError;
use crate::generation::text::{generate_text, ToolLoopOptions};
use crate::provider::ModelProvider;
use crate::tools::tool::Tool;
use crate::types::*;

use super::session::AgentSessionManager;

/// A specialist that answers one natural-language request.
///
/// Coordinators delegate through this trait so the specialist behind it can
/// be swapped (or mocked) without touching delegation logic.
#[async_trait]
pub trait SubAgent: Send + Sync {
    fn name(&self) -> &str;

    /// Run one stateless request and return the final text verbatim.
    async fn invoke(&self, request: &str) -> Result<String, ConciergeError>;
}

/// An agent: a model, a system prompt, and a tool set.
///
/// `invoke` is stateless. `execute` keeps per-thread history.
pub struct Agent {
    name: String,
    provider: Arc<dyn ModelProvider>,
    system_prompt: Option<String>,
    tools: Vec<Arc<dyn Tool>>,
    settings: GenerationSettings,
    options: ToolLoopOptions,
    sessions: Mutex<AgentSessionManager>,
}

impl Agent {
    /// Create a new agent.
    pub fn new(name: impl Into<String>, provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            name: name.into(),
            provider,
            system_prompt: None,
            tools: Vec::new(),
            settings: GenerationSettings::default(),
            options: ToolLoopOptions::default(),
            sessions: Mutex::new(AgentSessionManager::new()),
        }
    }

    /// Set system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Add a tool.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Add several tools.
    pub fn with_tools(mut self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        self.tools.extend(tools);
        self
    }

    /// Cap the number of model calls per turn.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.options.max_iterations = max_iterations;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the tools this agent may call.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    fn prompt_prefix(&self) -> Vec<ModelMessage> {
        self.system_prompt
            .iter()
            .map(|sys| ModelMessage::system(sys.clone()))
            .collect()
    }

    /// Run a single request with no history.
    pub async fn run_once(&self, message: &str) -> Result<GenerateTextResult, ConciergeError> {
        let mut messages = self.prompt_prefix();
        messages.push(ModelMessage::user(message));
        generate_text(
            self.provider.as_ref(),
            messages,
            self.settings.clone(),
            &self.tools,
            &self.options,
        )
        .await
    }

    /// Run one turn on `thread_id`, continuing that thread's history.
    ///
    /// The turn's messages (tool calls included) are committed to the thread
    /// only when generation succeeds.
    pub async fn run_turn(
        &self,
        thread_id: &str,
        message: &str,
    ) -> Result<GenerateTextResult, ConciergeError> {
        let handle = self
            .sessions
            .lock()
            .map_err(|_| ConciergeError::InvalidState("session registry poisoned".into()))?
            .get_or_create(thread_id);
        let mut conversation = handle.lock().await;

        let mut messages = self.prompt_prefix();
        messages.extend(conversation.messages().iter().cloned());
        messages.push(ModelMessage::user(message));
        let history_len = messages.len() - 1;

        let options = ToolLoopOptions {
            thread_id: Some(thread_id.to_string()),
            ..self.options.clone()
        };
        let result = generate_text(
            self.provider.as_ref(),
            messages,
            self.settings.clone(),
            &self.tools,
            &options,
        )
        .await?;

        conversation.extend(result.messages[history_len..].iter().cloned());
        tracing::debug!(
            agent = %self.name,
            thread_id,
            history = conversation.len(),
            "turn committed"
        );
        Ok(result)
    }

    /// Execute a user message on a thread and return the final text.
    pub async fn execute(&self, thread_id: &str, message: &str) -> Result<String, ConciergeError> {
        Ok(self.run_turn(thread_id, message).await?.text)
    }

    /// Snapshot of a thread's history (without the system prompt).
    pub async fn history(&self, thread_id: &str) -> Vec<ModelMessage> {
        let handle = match self.sessions.lock() {
            Ok(sessions) => sessions.get(thread_id),
            Err(_) => None,
        };
        match handle {
            Some(handle) => handle.lock().await.messages().to_vec(),
            None => Vec::new(),
        }
    }

    /// Forget a thread's history.
    pub fn clear_history(&self, thread_id: &str) {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.remove(thread_id);
        }
    }
}

#[async_trait]
impl SubAgent for Agent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, request: &str) -> Result<String, ConciergeError> {
        tracing::info!(agent = %self.name, "sub-agent invoked");
        Ok(self.run_once(request).await?.text)
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("provider", &self.provider.provider_name())
            .field("model", &self.provider.model_id())
            .field("tools", &self.tool_names())
            .finish()
    }
}
