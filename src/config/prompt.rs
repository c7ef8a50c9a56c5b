use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;
use log::info;

pub const DEFAULT_SYSTEM_PROMPT: &str = "당신은 'Dadly'라는 가족 기록 아카이브 서비스의 AI 어시스턴트입니다.

Dadly는 아빠가 남긴 기록과 이야기를 가족과 함께 나누고, 시간이 흘러도 잊히지 않도록 보존하는 서비스입니다.

당신의 역할:
1. 가족의 추억과 기록에 대해 따뜻하고 공감적인 대화를 나눕니다
2. 아빠의 기록을 찾거나 정리하는 것을 도와줍니다
3. 가족의 소중한 순간들을 기억하고 보존하는 방법을 제안합니다
4. 감정적이고 따뜻한 톤을 유지하면서 실용적인 도움을 제공합니다

답변할 때는:
- 항상 따뜻하고 공감적인 톤을 유지하세요
- 가족의 소중함을 강조하세요
- 실용적이면서도 감정적인 조언을 제공하세요
- 한국어로 답변하세요";

pub const DEFAULT_APOLOGY_MESSAGE: &str =
    "죄송합니다. 일시적인 오류가 발생했습니다. 잠시 후 다시 시도해주세요.";

#[derive(Debug)]
pub enum PromptError {
    EmptyPrompt(String),
    IoError(std::io::Error),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::EmptyPrompt(path) => write!(f, "System prompt file '{}' is empty", path),
            PromptError::IoError(e) => write!(f, "Prompt file IO error: {}", e),
        }
    }
}

impl Error for PromptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PromptError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PromptError {
    fn from(err: std::io::Error) -> Self {
        PromptError::IoError(err)
    }
}

/// Fixed texts the orchestrator sends or substitutes on every turn.
#[derive(Debug, Clone)]
pub struct PromptConfig {
    pub system_prompt: String,
    pub apology_message: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            apology_message: DEFAULT_APOLOGY_MESSAGE.to_string(),
        }
    }
}

impl PromptConfig {
    /// Apology text for a failed completion; `detail` is appended in debug mode.
    pub fn apology(&self, detail: Option<&str>) -> String {
        match detail {
            Some(detail) => format!("{} (Error: {})", self.apology_message, detail),
            None => self.apology_message.clone(),
        }
    }
}

pub fn load_system_prompt<P: AsRef<Path>>(path: P) -> Result<String, PromptError> {
    let content = fs::read_to_string(&path)?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(PromptError::EmptyPrompt(path.as_ref().display().to_string()));
    }
    Ok(trimmed.to_string())
}

pub fn load_prompts(
    system_prompt_path: Option<&str>,
    apology_message: Option<&str>
) -> Result<PromptConfig, PromptError> {
    let mut config = PromptConfig::default();
    if let Some(path) = system_prompt_path {
        info!("Loading system prompt from {}", path);
        config.system_prompt = load_system_prompt(path)?;
    }
    if let Some(apology) = apology_message.map(str::trim).filter(|a| !a.is_empty()) {
        config.apology_message = apology.to_string();
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_without_overrides() {
        let config = load_prompts(None, None).unwrap();
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(config.apology_message, DEFAULT_APOLOGY_MESSAGE);
    }

    fn has_hangul(text: &str) -> bool {
        text.chars().any(|c| ('\u{AC00}'..='\u{D7A3}').contains(&c))
    }

    #[test]
    fn default_texts_share_one_language() {
        assert!(has_hangul(DEFAULT_SYSTEM_PROMPT));
        assert!(has_hangul(DEFAULT_APOLOGY_MESSAGE));
        assert!(DEFAULT_SYSTEM_PROMPT.ends_with("한국어로 답변하세요"));
    }

    #[test]
    fn apology_includes_detail_only_when_given() {
        let config = PromptConfig {
            system_prompt: String::new(),
            apology_message: "Sorry.".into(),
        };
        assert_eq!(config.apology(None), "Sorry.");
        assert_eq!(config.apology(Some("timeout")), "Sorry. (Error: timeout)");
    }

    #[test]
    fn reads_system_prompt_from_file() {
        let path = std::env::temp_dir().join(format!("dadly-prompt-{}.txt", uuid::Uuid::new_v4()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "  Be brief.  ").unwrap();

        let config = load_prompts(path.to_str(), Some("  ")).unwrap();
        assert_eq!(config.system_prompt, "Be brief.");
        assert_eq!(config.apology_message, DEFAULT_APOLOGY_MESSAGE);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_or_empty_file_is_an_error() {
        assert!(matches!(load_prompts(Some("/nonexistent/prompt.txt"), None), Err(PromptError::IoError(_))));

        let path = std::env::temp_dir().join(format!("dadly-empty-{}.txt", uuid::Uuid::new_v4()));
        fs::write(&path, "\n").unwrap();
        assert!(matches!(load_system_prompt(&path), Err(PromptError::EmptyPrompt(_))));
        fs::remove_file(&path).unwrap();
    }
}
