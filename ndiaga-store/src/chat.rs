use crate::kv::KeyValueStore;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

const CHAT_HISTORY_KEY: &str = "chatbot_history";
const MAX_CONVERSATIONS: usize = 10;
const FRESHNESS_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub from_user: bool,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConversation {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
}

impl ChatConversation {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            messages: Vec::new(),
        }
    }
}

impl Default for ChatConversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Persisted chat-assistant history, bounded both ways: at most 10
/// conversations are kept, and anything older than 24 hours is pruned on
/// load.
pub struct ChatHistory {
    storage: Arc<dyn KeyValueStore>,
}

impl ChatHistory {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    pub fn load(&self) -> Vec<ChatConversation> {
        self.load_at(Utc::now())
    }

    fn load_at(&self, now: DateTime<Utc>) -> Vec<ChatConversation> {
        let raw = match self.storage.get(CHAT_HISTORY_KEY) {
            Some(raw) => raw,
            None => return Vec::new(),
        };
        let conversations: Vec<ChatConversation> = match serde_json::from_str(&raw) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Discarding unreadable chat history: {}", e);
                self.storage.remove(CHAT_HISTORY_KEY);
                return Vec::new();
            }
        };
        let cutoff = now - Duration::hours(FRESHNESS_HOURS);
        conversations
            .into_iter()
            .filter(|c| c.started_at > cutoff)
            .collect()
    }

    pub fn append(&self, conversation: ChatConversation) {
        let mut conversations = self.load();
        conversations.push(conversation);
        if conversations.len() > MAX_CONVERSATIONS {
            let excess = conversations.len() - MAX_CONVERSATIONS;
            conversations.drain(..excess);
        }
        match serde_json::to_string(&conversations) {
            Ok(raw) => self.storage.set(CHAT_HISTORY_KEY, &raw),
            Err(e) => tracing::warn!("Failed to persist chat history: {}", e),
        }
    }

    pub fn clear(&self) {
        self.storage.remove(CHAT_HISTORY_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    fn history() -> ChatHistory {
        ChatHistory::new(Arc::new(MemoryStore::new()))
    }

    fn conversation_started(hours_ago: i64) -> ChatConversation {
        ChatConversation {
            id: Uuid::new_v4(),
            started_at: Utc::now() - Duration::hours(hours_ago),
            messages: vec![ChatMessage {
                from_user: true,
                text: "Bonjour".to_string(),
            }],
        }
    }

    #[test]
    fn test_history_bounded_to_ten_conversations() {
        let history = history();
        for _ in 0..12 {
            history.append(conversation_started(0));
        }
        assert_eq!(history.load().len(), 10);
    }

    #[test]
    fn test_stale_conversations_pruned_on_load() {
        let history = history();
        history.append(conversation_started(30));
        history.append(conversation_started(1));
        let fresh = history.load();
        assert_eq!(fresh.len(), 1);
    }

    #[test]
    fn test_clear_empties_history() {
        let history = history();
        history.append(conversation_started(0));
        history.clear();
        assert!(history.load().is_empty());
    }
}
