//! Ollama local provider (OpenAI-compatible).

use async_trait::async_trait;

use crate::error::ConciergeError;

use super::openai::OpenAiProvider;
use super::{ModelProvider, ProviderRequest, ProviderResponse};

pub struct OllamaProvider {
    inner: OpenAiProvider,
}

impl OllamaProvider {
    /// `base_url` is the Ollama root, e.g. `http://localhost:11434`.
    pub fn new(model_id: String, base_url: &str) -> Self {
        Self {
            inner: OpenAiProvider::new(
                "ollama",
                model_id,
                String::new(),
                format!("{}/v1", base_url.trim_end_matches('/')),
            ),
        }
    }

    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }
}

#[async_trait]
impl ModelProvider for OllamaProvider {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serves_under_v1() {
        let provider = OllamaProvider::new("llama3.2".into(), "http://localhost:11434/");
        assert_eq!(provider.base_url(), "http://localhost:11434/v1");
        assert_eq!(provider.provider_name(), "ollama");
    }
}
