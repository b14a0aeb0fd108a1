//! Model provider trait and implementations.

pub mod http;
pub mod ollama;
pub mod openai;
pub mod openai_compatible;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ConciergeConfig;
use crate::error::ConciergeError;
use crate::models::LanguageModel;
use crate::types::{message::AgentToolCall, FinishReason, GenerationSettings, ModelMessage, Usage};

/// A request sent to a model provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub messages: Vec<ModelMessage>,
    pub settings: GenerationSettings,
    pub tools: Option<Vec<ToolDefinition>>,
}

/// Tool definition sent to the provider API.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Response from a provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
    pub text: String,
    pub usage: Usage,
    pub tool_calls: Vec<AgentToolCall>,
    pub finish_reason: Option<FinishReason>,
}

/// Core trait implemented by all model providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "ollama").
    fn provider_name(&self) -> &str;
    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Generate one assistant turn (non-streaming).
    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, ConciergeError>;
}

/// Create a provider for the given model, using the provided config.
pub fn create_provider(
    model: &LanguageModel,
    config: &ConciergeConfig,
) -> Result<Arc<dyn ModelProvider>, ConciergeError> {
    match model {
        LanguageModel::Ollama(id) => Ok(Arc::new(ollama::OllamaProvider::new(
            id.clone(),
            &config.ollama_base_url,
        ))),
        LanguageModel::OpenAiCompatible(id) => {
            let base_url = config.openai_compatible_base_url.clone().ok_or_else(|| {
                ConciergeError::Configuration("Missing OPENAI_COMPAT_BASE_URL".into())
            })?;
            Ok(Arc::new(openai_compatible::OpenAiCompatibleProvider::new(
                id.clone(),
                config.openai_compatible_api_key.clone().unwrap_or_default(),
                base_url,
            )))
        }
    }
}
