use async_trait::async_trait;
use super::{ ChatClient, CompletionRequest, CompletionResponse };
use crate::llm::{ LlmError, LlmType };

/// Offline stand-in used when no real API key is configured.
#[derive(Debug, Default, Clone)]
pub struct MockChatClient;

impl MockChatClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Ok(CompletionResponse {
            response: format!(
                "안녕하세요! Dadly AI 어시스턴트입니다. '{}'에 대한 답변을 드리겠습니다. \
                 현재는 테스트 모드로 실행 중입니다. 실제 OpenAI API 키를 설정하시면 더 정교한 대화가 가능합니다.",
                request.message
            ),
        })
    }

    fn get_model(&self) -> String {
        "mock".to_string()
    }

    fn get_base_url(&self) -> Option<String> {
        None
    }

    fn get_llm_type(&self) -> LlmType {
        LlmType::Mock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echoes_the_user_message() {
        let request = CompletionRequest {
            system: String::new(),
            history: Vec::new(),
            message: "what did dad like to cook?".into(),
        };
        let reply = MockChatClient::new().complete(&request).await.unwrap();
        assert!(reply.response.contains("'what did dad like to cook?'"));
        assert!(reply.response.starts_with("안녕하세요! Dadly AI 어시스턴트입니다."));
    }
}
