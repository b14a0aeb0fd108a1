//! Per-thread conversation storage.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::conversation::Conversation;

/// Shared handle to one thread's conversation.
///
/// Holding the lock for a whole turn serializes turns on the same thread
/// while leaving other threads free.
pub type ConversationHandle = Arc<Mutex<Conversation>>;

/// Maps thread ids to their conversations.
#[derive(Debug, Default)]
pub struct AgentSessionManager {
    sessions: HashMap<String, ConversationHandle>,
}

impl AgentSessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create a session by thread id.
    pub fn get_or_create(&mut self, thread_id: &str) -> ConversationHandle {
        self.sessions
            .entry(thread_id.to_string())
            .or_default()
            .clone()
    }

    /// Get an existing session.
    pub fn get(&self, thread_id: &str) -> Option<ConversationHandle> {
        self.sessions.get(thread_id).cloned()
    }

    /// Remove a session.
    pub fn remove(&mut self, thread_id: &str) -> Option<ConversationHandle> {
        self.sessions.remove(thread_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ModelMessage;

    #[tokio::test]
    async fn same_thread_id_shares_history() {
        let mut manager = AgentSessionManager::new();
        manager
            .get_or_create("t-1")
            .lock()
            .await
            .extend([ModelMessage::user("hello")]);

        let again = manager.get_or_create("t-1");
        assert_eq!(again.lock().await.len(), 1);
        assert!(manager.get("t-2").is_none());
    }

    #[tokio::test]
    async fn remove_drops_the_thread() {
        let mut manager = AgentSessionManager::new();
        manager.get_or_create("t-1");
        assert!(manager.remove("t-1").is_some());
        assert!(manager.get("t-1").is_none());
    }
}
