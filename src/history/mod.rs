mod store;

pub use store::MessageStore;

use crate::models::chat::ChatMessage;
use log::{ debug, info };
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{ Mutex, MutexGuard, RwLock };
use uuid::Uuid;

/// One conversation: its messages plus the lock that serializes turns.
///
/// Readers only take the message lock, which is held for the length of an
/// append, so a history read never waits on an in-flight completion.
#[derive(Debug, Default)]
pub struct Conversation {
    turn: Mutex<()>,
    store: RwLock<MessageStore>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for any other turn on this conversation to finish. Keep the
    /// guard until the turn's messages are appended.
    pub async fn begin_turn(&self) -> MutexGuard<'_, ()> {
        self.turn.lock().await
    }

    pub async fn snapshot(&self) -> Vec<ChatMessage> {
        self.store.read().await.messages().to_vec()
    }

    pub async fn push_turn(&self, user_content: &str, assistant_content: &str) {
        self.store.write().await.push_turn(user_content, assistant_content);
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

pub type SharedConversation = Arc<Conversation>;

const MAX_CONVERSATION_ID_LEN: usize = 128;

pub fn new_conversation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Accepts 1-128 characters of ASCII letters, digits, `-` and `_`.
pub fn is_valid_conversation_id(id: &str) -> bool {
    !id.is_empty() &&
        id.len() <= MAX_CONVERSATION_ID_LEN &&
        id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// In-process map from conversation id to its message store.
///
/// Entries are created lazily and live until [`ConversationRegistry::clear`]
/// or process exit. There is no eviction and no capacity bound.
#[derive(Debug, Default)]
pub struct ConversationRegistry {
    conversations: RwLock<HashMap<String, SharedConversation>>,
}

impl ConversationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the conversation for `id`, creating it when unknown. With no id
    /// a fresh one is generated and registered. The returned id is the key the
    /// conversation lives under.
    pub async fn get_or_create(&self, id: Option<&str>) -> (String, SharedConversation) {
        if let Some(id) = id {
            if let Some(conversation) = self.conversations.read().await.get(id) {
                return (id.to_string(), Arc::clone(conversation));
            }
        }

        let mut conversations = self.conversations.write().await;
        let id = match id {
            Some(id) => id.to_string(),
            None => {
                let mut candidate = new_conversation_id();
                while conversations.contains_key(&candidate) {
                    candidate = new_conversation_id();
                }
                candidate
            }
        };

        let conversation = conversations
            .entry(id.clone())
            .or_insert_with(|| {
                info!("Created conversation {}", id);
                Arc::new(Conversation::new())
            });
        (id, Arc::clone(conversation))
    }

    /// Snapshot of the conversation's messages. Unknown ids yield an empty
    /// vector and are not registered.
    pub async fn history(&self, id: &str) -> Vec<ChatMessage> {
        let conversation = match self.conversations.read().await.get(id) {
            Some(conversation) => Arc::clone(conversation),
            None => {
                debug!("History requested for unknown conversation {}", id);
                return Vec::new();
            }
        };
        conversation.snapshot().await
    }

    pub async fn clear(&self, id: &str) -> bool {
        let removed = self.conversations.write().await.remove(id).is_some();
        if removed {
            info!("Cleared conversation {}", id);
        }
        removed
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.conversations.read().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }
}
