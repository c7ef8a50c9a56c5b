use clap::{ Parser, ValueEnum };

/// What the orchestrator does when the language model call fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FailurePolicy {
    /// Reply with the apology message through the normal success path.
    Apology,
    /// Surface the failure to the caller (HTTP 502).
    Error,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Host address and port for the HTTP server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "0.0.0.0:8000")]
    pub server_addr: String,

    /// Application name reported by the root endpoint.
    #[arg(long, env = "APP_NAME", default_value = "Dadly")]
    pub app_name: String,

    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,

    // --- Chat LLM Provider Args ---
    /// Type of LLM provider for chat completion (openai, ollama, mock)
    #[arg(long, env = "CHAT_LLM_TYPE", default_value = "openai")]
    pub chat_llm_type: String,

    /// Base URL for the Chat LLM provider API (e.g., http://localhost:11434 for Ollama)
    #[arg(long, env = "CHAT_BASE_URL")] // No default, let adapters handle defaults if None
    pub chat_base_url: Option<String>,

    /// API Key for the Chat LLM provider. Empty or `sk-test...` keys run the mock client.
    #[arg(long, env = "CHAT_API_KEY", default_value = "")]
    pub chat_api_key: String,

    /// Model name for chat completion (e.g., gpt-3.5-turbo, llama3)
    #[arg(long, env = "CHAT_MODEL")] // No default, rely on adapter defaults if None
    pub chat_model: Option<String>,

    /// Sampling temperature passed to the provider.
    #[arg(long, env = "CHAT_TEMPERATURE", default_value = "0.7")]
    pub chat_temperature: f32,

    /// Timeout in seconds for a single completion request.
    #[arg(long, env = "CHAT_TIMEOUT_SECS", default_value = "60")]
    pub chat_timeout_secs: u64,

    // --- Conversation Args ---
    /// Optional file whose contents replace the built-in system prompt.
    #[arg(long, env = "SYSTEM_PROMPT_PATH")]
    pub system_prompt_path: Option<String>,

    /// Reply sent to the user when the language model call fails.
    #[arg(long, env = "APOLOGY_MESSAGE")]
    pub apology_message: Option<String>,

    /// How to handle a failed language model call.
    #[arg(long, env = "FAILURE_POLICY", value_enum, default_value = "apology")]
    pub failure_policy: FailurePolicy,

    /// Upper bound on the length of a user message, in characters.
    #[arg(long, env = "MAX_MESSAGE_CHARS", default_value = "8000")]
    pub max_message_chars: usize,

    // --- General App Args ---
    /// Enable debug logging and include error details in apology replies.
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}

/// Shows only the first characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return "None".to_string();
    }
    let prefix: String = secret.chars().take(6).collect();
    format!("{}...", prefix)
}
