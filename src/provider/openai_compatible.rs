//! Generic OpenAI-compatible provider.

use async_trait::async_trait;

use crate::error::ConciergeError;

use super::openai::OpenAiProvider;
use super::{ModelProvider, ProviderRequest, ProviderResponse};

/// Provider for any server exposing `/chat/completions` under `base_url`.
pub struct OpenAiCompatibleProvider {
    inner: OpenAiProvider,
}

impl OpenAiCompatibleProvider {
    pub fn new(model_id: String, api_key: String, base_url: String) -> Self {
        Self {
            inner: OpenAiProvider::new("openai-compatible", model_id, api_key, base_url),
        }
    }
}

#[async_trait]
impl ModelProvider for OpenAiCompatibleProvider {
    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, ConciergeError> {
        self.inner.generate_text(request).await
    }
}
