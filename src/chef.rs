//! Chef assistant: recipe ideas from the ingredients a user has.

use std::sync::Arc;

use crate::agent::Agent;
use crate::config::ConciergeConfig;
use crate::error::ConciergeError;
use crate::integrations::tavily::{web_search_tool, TavilyClient};
use crate::prompts;
use crate::provider::{create_provider, ModelProvider};
use crate::types::GenerateTextResult;

/// One agent with web search; history is kept per thread id.
#[derive(Debug)]
pub struct ChefAssistant {
    agent: Agent,
}

impl ChefAssistant {
    pub fn new(provider: Arc<dyn ModelProvider>, tavily: Arc<TavilyClient>) -> Self {
        Self::with_agent(
            Agent::new("chef", provider)
                .with_system_prompt(prompts::CHEF)
                .with_tool(web_search_tool(tavily)),
        )
    }

    /// Wrap a preconfigured agent.
    pub fn with_agent(agent: Agent) -> Self {
        Self { agent }
    }

    pub fn from_config(config: &ConciergeConfig) -> Result<Self, ConciergeError> {
        let provider = create_provider(&config.language_model()?, config)?;
        let tavily = Arc::new(TavilyClient::from_config(config)?);
        let chef = Self::new(provider, tavily);
        Ok(Self::with_agent(
            chef.agent.with_max_iterations(config.max_tool_iterations),
        ))
    }

    /// Ask on a thread; follow-ups on the same thread see earlier turns.
    pub async fn ask(&self, thread_id: &str, message: &str) -> Result<String, ConciergeError> {
        Ok(self.ask_detailed(thread_id, message).await?.text)
    }

    pub async fn ask_detailed(
        &self,
        thread_id: &str,
        message: &str,
    ) -> Result<GenerateTextResult, ConciergeError> {
        tracing::info!(thread_id, "chef turn");
        self.agent.run_turn(thread_id, message).await
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }
}
