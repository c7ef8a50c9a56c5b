use crate::cli::{ mask_secret, Args, FailurePolicy };
use crate::config::prompt::{ self, PromptConfig };
use crate::history::{ is_valid_conversation_id, ConversationRegistry };
use crate::llm::{ LlmConfig, LlmError };
use crate::llm::chat::{ new_client as new_chat_client, ChatClient, CompletionRequest };
use crate::models::chat::{ ChatMessage, ChatResponse };

use chrono::Utc;
use log::{ debug, error, info, warn };
use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Completion failed: {0}")]
    Completion(#[source] LlmError),
}

/// Result of one completion attempt, kept separate from what the caller sees.
#[derive(Debug)]
enum CompletionOutcome {
    Reply(String),
    Failed(LlmError),
}

#[derive(Debug, Clone)]
pub struct AgentOptions {
    pub failure_policy: FailurePolicy,
    pub max_message_chars: usize,
    /// Append the underlying error to apology replies.
    pub debug: bool,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::Apology,
            max_message_chars: 8000,
            debug: false,
        }
    }
}

/// Coordinates lookup, completion and append for each chat turn.
#[derive(Clone)]
pub struct ChatAgent {
    chat_client: Arc<dyn ChatClient>,
    registry: Arc<ConversationRegistry>,
    prompts: Arc<PromptConfig>,
    options: AgentOptions,
}

impl ChatAgent {
    pub fn new(
        chat_client: Arc<dyn ChatClient>,
        registry: Arc<ConversationRegistry>,
        prompts: PromptConfig,
        options: AgentOptions
    ) -> Self {
        Self {
            chat_client,
            registry,
            prompts: Arc::new(prompts),
            options,
        }
    }

    pub fn from_args(args: &Args) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let chat_config = LlmConfig {
            llm_type: args.chat_llm_type
                .parse()
                .map_err(|e| format!("Invalid chat LLM type: {}", e))?,
            api_key: Some(args.chat_api_key.clone()).filter(|k| !k.is_empty()),
            completion_model: args.chat_model.clone(),
            base_url: args.chat_base_url.clone(),
            temperature: args.chat_temperature,
            timeout: Duration::from_secs(args.chat_timeout_secs),
        };
        let chat_client = new_chat_client(&chat_config)?;
        info!(
            "Chat client configured: Type={}, Model={}, BaseURL={}, Key={}",
            chat_client.get_llm_type(),
            chat_client.get_model(),
            chat_client.get_base_url().as_deref().unwrap_or("n/a"),
            mask_secret(&args.chat_api_key)
        );

        let prompts = prompt::load_prompts(
            args.system_prompt_path.as_deref(),
            args.apology_message.as_deref()
        )?;

        let options = AgentOptions {
            failure_policy: args.failure_policy,
            max_message_chars: args.max_message_chars,
            debug: args.debug,
        };

        Ok(Self::new(chat_client, Arc::new(ConversationRegistry::new()), prompts, options))
    }

    /// Runs one turn. A blank `conversation_id` counts as absent and starts a
    /// new conversation.
    pub async fn chat(
        &self,
        message: &str,
        conversation_id: Option<&str>,
        user_id: Option<&str>
    ) -> Result<ChatResponse, ChatError> {
        let conversation_id = conversation_id.map(str::trim).filter(|id| !id.is_empty());
        self.validate(message, conversation_id)?;

        let (conversation_id, conversation) = self.registry.get_or_create(conversation_id).await;
        debug!(
            "Chat turn for conversation {} (user {})",
            conversation_id,
            user_id.unwrap_or("anonymous")
        );

        // Held until the turn is appended so turns in one conversation never interleave.
        let turn = conversation.begin_turn().await;
        let request = CompletionRequest {
            system: self.prompts.system_prompt.clone(),
            history: conversation.snapshot().await,
            message: message.to_string(),
        };

        let reply = match self.invoke(&request).await {
            CompletionOutcome::Reply(text) => text,
            CompletionOutcome::Failed(err) =>
                match self.options.failure_policy {
                    FailurePolicy::Apology => {
                        warn!(
                            "Completion failed for conversation {}, replying with apology: {}",
                            conversation_id,
                            err
                        );
                        let detail = self.options.debug.then(|| err.to_string());
                        self.prompts.apology(detail.as_deref())
                    }
                    FailurePolicy::Error => {
                        error!("Completion failed for conversation {}: {}", conversation_id, err);
                        return Err(ChatError::Completion(err));
                    }
                }
        };

        conversation.push_turn(message, &reply).await;
        drop(turn);

        Ok(ChatResponse {
            message: reply,
            conversation_id,
            message_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
        })
    }

    pub async fn get_conversation_history(&self, conversation_id: &str) -> Vec<ChatMessage> {
        self.registry.history(conversation_id).await
    }

    pub async fn clear_conversation(&self, conversation_id: &str) -> bool {
        self.registry.clear(conversation_id).await
    }

    pub async fn conversation_count(&self) -> usize {
        self.registry.len().await
    }

    fn validate(&self, message: &str, conversation_id: Option<&str>) -> Result<(), ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::InvalidInput("message must not be empty".into()));
        }
        let length = message.chars().count();
        if length > self.options.max_message_chars {
            return Err(
                ChatError::InvalidInput(
                    format!(
                        "message is {} characters, limit is {}",
                        length,
                        self.options.max_message_chars
                    )
                )
            );
        }
        if let Some(id) = conversation_id {
            if !is_valid_conversation_id(id) {
                return Err(ChatError::InvalidInput(format!("invalid conversation_id '{}'", id)));
            }
        }
        Ok(())
    }

    async fn invoke(&self, request: &CompletionRequest) -> CompletionOutcome {
        match self.chat_client.complete(request).await {
            Ok(resp) => {
                let text = resp.response.trim();
                if text.is_empty() {
                    CompletionOutcome::Failed(
                        LlmError::MalformedResponse("empty completion".to_string())
                    )
                } else {
                    CompletionOutcome::Reply(text.to_string())
                }
            }
            Err(e) => CompletionOutcome::Failed(e),
        }
    }
}
