//! Shared test helpers: a scripted mock provider and a counting sub-agent.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use concierge::agent::SubAgent;
use concierge::error::ConciergeError;
use concierge::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use concierge::types::*;

/// A mock provider that replays queued responses and records every request.
pub struct MockProvider {
    model_id: String,
    responses: Mutex<Vec<Result<ProviderResponse, ConciergeError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    pub fn new(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            responses: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a final text response.
    pub fn queue_text(&self, text: &str) {
        self.responses.lock().unwrap().push(Ok(ProviderResponse {
            text: text.to_string(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
                total_tokens: 30,
            },
            tool_calls: vec![],
            finish_reason: Some(FinishReason::Stop),
        }));
    }

    /// Queue a response requesting one tool call.
    pub fn queue_tool_call(&self, id: &str, name: &str, args: serde_json::Value) {
        self.queue_tool_calls(&[(id, name, args)]);
    }

    /// Queue a response requesting several tool calls at once.
    pub fn queue_tool_calls(&self, calls: &[(&str, &str, serde_json::Value)]) {
        self.responses.lock().unwrap().push(Ok(ProviderResponse {
            text: String::new(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
                total_tokens: 15,
            },
            tool_calls: calls
                .iter()
                .map(|(id, name, args)| AgentToolCall {
                    id: id.to_string(),
                    name: name.to_string(),
                    arguments: args.clone(),
                })
                .collect(),
            finish_reason: Some(FinishReason::ToolCalls),
        }));
    }

    /// Queue a provider failure.
    pub fn queue_error(&self, error: ConciergeError) {
        self.responses.lock().unwrap().push(Err(error));
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn pending(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, ConciergeError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(ProviderResponse {
                text: "Mock response".to_string(),
                usage: Usage::default(),
                tool_calls: vec![],
                finish_reason: Some(FinishReason::Stop),
            });
        }
        responses.remove(0)
    }
}

/// Sub-agent that records the requests it receives and answers from a script.
pub struct RecordingSubAgent {
    name: String,
    reply: Result<String, String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<String>>,
}

impl RecordingSubAgent {
    pub fn replying(name: &str, reply: &str) -> Self {
        Self {
            name: name.to_string(),
            reply: Ok(reply.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(name: &str, message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            ..Self::replying(name, "")
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubAgent for RecordingSubAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, request: &str) -> Result<String, ConciergeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply
            .clone()
            .map_err(|message| ConciergeError::Provider {
                provider: "mock".into(),
                message,
            })
    }
}

/// The text of the tool result answering `tool_call_id` in a request.
pub fn tool_result_text(request: &ProviderRequest, tool_call_id: &str) -> Option<String> {
    request.messages.iter().find_map(|message| {
        message
            .tool_result_part()
            .filter(|result| result.tool_call_id == tool_call_id)
            .map(|result| result.as_text())
    })
}
