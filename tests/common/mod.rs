#![allow(dead_code)]

use async_trait::async_trait;
use dadly_chat::agent::{ AgentOptions, ChatAgent };
use dadly_chat::config::prompt::PromptConfig;
use dadly_chat::history::ConversationRegistry;
use dadly_chat::llm::chat::{ ChatClient, CompletionRequest, CompletionResponse };
use dadly_chat::llm::{ LlmError, LlmType };
use std::collections::VecDeque;
use std::sync::{ Arc, Mutex };
use std::time::Duration;

pub const APOLOGY: &str = "Sorry, something went wrong.";

/// Chat client that replays queued outcomes, then answers `reply to <message>`.
#[derive(Default)]
pub struct ScriptedClient {
    queued: Mutex<VecDeque<Result<String, LlmError>>>,
    seen: Mutex<Vec<CompletionRequest>>,
    delay: Option<Duration>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay: Some(delay), ..Self::default() }
    }

    pub fn push_reply(&self, reply: &str) {
        self.queued.lock().unwrap().push_back(Ok(reply.to_string()));
    }

    pub fn push_failure(&self, err: LlmError) {
        self.queued.lock().unwrap().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.seen.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.queued.lock().unwrap().pop_front();
        match next {
            Some(Ok(response)) => Ok(CompletionResponse { response }),
            Some(Err(e)) => Err(e),
            None => Ok(CompletionResponse { response: format!("reply to {}", request.message) }),
        }
    }

    fn get_model(&self) -> String {
        "scripted".to_string()
    }

    fn get_base_url(&self) -> Option<String> {
        None
    }

    fn get_llm_type(&self) -> LlmType {
        LlmType::Mock
    }
}

pub fn prompts() -> PromptConfig {
    PromptConfig {
        system_prompt: "You are a test assistant.".to_string(),
        apology_message: APOLOGY.to_string(),
    }
}

pub fn agent_with(client: Arc<ScriptedClient>, options: AgentOptions) -> ChatAgent {
    ChatAgent::new(client, Arc::new(ConversationRegistry::new()), prompts(), options)
}

pub fn agent(client: Arc<ScriptedClient>) -> ChatAgent {
    agent_with(client, AgentOptions::default())
}
