use crate::models::chat::ChatMessage;

/// Append-only message sequence for a single conversation.
#[derive(Debug, Default, Clone)]
pub struct MessageStore {
    messages: Vec<ChatMessage>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Appends a user message followed by the assistant reply.
    pub fn push_turn(&mut self, user_content: &str, assistant_content: &str) {
        self.push(ChatMessage::user(user_content));
        self.push(ChatMessage::assistant(assistant_content));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
