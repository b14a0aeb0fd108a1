//! Conversation message history.

use crate::types::ModelMessage;

/// One thread's message history, tool calls and tool results included.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ModelMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append messages produced by a completed turn.
    pub fn extend(&mut self, messages: impl IntoIterator<Item = ModelMessage>) {
        self.messages.extend(messages);
    }

    /// Get all messages.
    pub fn messages(&self) -> &[ModelMessage] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
