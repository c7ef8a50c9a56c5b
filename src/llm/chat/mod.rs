pub mod mock;
pub mod ollama;
pub mod openai;

use async_trait::async_trait;
use log::info;
use serde::{ Deserialize, Serialize };
use std::sync::Arc;
use super::{ LlmConfig, LlmError, LlmType };
use self::mock::MockChatClient;
use self::ollama::OllamaClient;
use self::openai::OpenAIChatClient;
use crate::models::chat::ChatMessage;

/// Everything a provider needs for one turn: the system instructions, the
/// prior conversation and the new user message.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub history: Vec<ChatMessage>,
    pub message: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CompletionResponse {
    pub response: String,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> Option<String>;
    fn get_llm_type(&self) -> LlmType;
}

/// Role/content pair in the shape both OpenAI and Ollama accept.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

/// Flattens a request into `[system, ...history, user]`.
pub fn to_wire_messages(request: &CompletionRequest) -> Vec<WireMessage> {
    let mut messages = Vec::with_capacity(request.history.len() + 2);
    if !request.system.is_empty() {
        messages.push(WireMessage {
            role: "system".to_string(),
            content: request.system.clone(),
        });
    }
    messages.extend(
        request.history.iter().map(|msg| WireMessage {
            role: msg.role.as_str().to_string(),
            content: msg.content.clone(),
        })
    );
    messages.push(WireMessage {
        role: "user".to_string(),
        content: request.message.clone(),
    });
    messages
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, LlmError> {
    let client: Arc<dyn ChatClient> = match config.effective_type() {
        LlmType::OpenAI => Arc::new(OpenAIChatClient::from_config(config)?),
        LlmType::Ollama => Arc::new(OllamaClient::from_config(config)?),
        LlmType::Mock => {
            if config.llm_type == LlmType::OpenAI {
                info!("No usable OpenAI API key configured; running with the mock chat client");
            }
            Arc::new(MockChatClient::new())
        }
    };
    Ok(client)
}
