//! Model selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConciergeError;

/// A language model reachable through a local or self-hosted server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "provider", content = "model")]
pub enum LanguageModel {
    /// Model served by Ollama (e.g. `llama3.2`).
    Ollama(String),
    /// Model served by any OpenAI-compatible chat completions endpoint.
    OpenAiCompatible(String),
}

impl LanguageModel {
    /// Get the model's API identifier string.
    pub fn model_id(&self) -> &str {
        match self {
            Self::Ollama(id) | Self::OpenAiCompatible(id) => id,
        }
    }

    /// Get the provider name.
    pub fn provider_name(&self) -> &str {
        match self {
            Self::Ollama(_) => "ollama",
            Self::OpenAiCompatible(_) => "openai-compatible",
        }
    }
}

impl fmt::Display for LanguageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider_name(), self.model_id())
    }
}

impl FromStr for LanguageModel {
    type Err = ConciergeError;

    /// Parse `provider:model_id`, e.g. `ollama:llama3.2`.
    ///
    /// A bare model id is taken as an Ollama model.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (provider, model_id) = match s.split_once(':') {
            Some((provider, model_id)) => (provider, model_id),
            None => ("ollama", s),
        };
        if model_id.trim().is_empty() {
            return Err(ConciergeError::InvalidArgument(format!(
                "Invalid model selector '{s}': expected 'provider:model_id'"
            )));
        }

        match provider {
            "ollama" => Ok(Self::Ollama(model_id.to_string())),
            "openai-compatible" | "openai_compatible" => {
                Ok(Self::OpenAiCompatible(model_id.to_string()))
            }
            other => Err(ConciergeError::ModelNotFound(format!(
                "Unknown provider '{other}'. Use ollama or openai-compatible."
            ))),
        }
    }
}
