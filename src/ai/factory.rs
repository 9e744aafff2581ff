use crate::ai::{
    anthropic::AnthropicProvider, cohere::CohereProvider, gemini::GeminiProvider,
    ollama::OllamaProvider, openai::OpenAiCompatibleProvider, server::ServerProvider, AiProvider,
};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 지원하는 LLM 백엔드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    /// 관리형 프록시 서비스 (알 수 없는 provider의 대체값)
    Server,
    Ollama,
    OpenAi,
    Anthropic,
    Gemini,
    Groq,
    Mistral,
    DeepSeek,
    OpenRouter,
    Cohere,
}

impl ProviderId {
    pub const ALL: [ProviderId; 10] = [
        ProviderId::Server,
        ProviderId::Ollama,
        ProviderId::OpenAi,
        ProviderId::Anthropic,
        ProviderId::Gemini,
        ProviderId::Groq,
        ProviderId::Mistral,
        ProviderId::DeepSeek,
        ProviderId::OpenRouter,
        ProviderId::Cohere,
    ];

    /// 설정 파일에서 알 수 없는 provider를 만났을 때 사용하는 백엔드
    pub const FALLBACK: ProviderId = ProviderId::Server;

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Server => "server",
            ProviderId::Ollama => "ollama",
            ProviderId::OpenAi => "openai",
            ProviderId::Anthropic => "anthropic",
            ProviderId::Gemini => "gemini",
            ProviderId::Groq => "groq",
            ProviderId::Mistral => "mistral",
            ProviderId::DeepSeek => "deepseek",
            ProviderId::OpenRouter => "openrouter",
            ProviderId::Cohere => "cohere",
        }
    }

    /// 이름(별칭 포함, 대소문자 무시)으로 찾기
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "server" | "managed" => Some(ProviderId::Server),
            "ollama" | "local" => Some(ProviderId::Ollama),
            "openai" | "gpt" => Some(ProviderId::OpenAi),
            "anthropic" | "claude" => Some(ProviderId::Anthropic),
            "gemini" | "google" => Some(ProviderId::Gemini),
            "groq" => Some(ProviderId::Groq),
            "mistral" => Some(ProviderId::Mistral),
            "deepseek" => Some(ProviderId::DeepSeek),
            "openrouter" => Some(ProviderId::OpenRouter),
            "cohere" => Some(ProviderId::Cohere),
            _ => None,
        }
    }

    /// 항상 provider 하나를 돌려줌 (비어 있거나 모르는 이름은 관리형 서비스)
    pub fn resolve(name: Option<&str>) -> Self {
        match name.and_then(Self::parse) {
            Some(id) => id,
            None => {
                debug!(
                    requested = name.unwrap_or(""),
                    fallback = %Self::FALLBACK,
                    "unknown provider, using managed service"
                );
                Self::FALLBACK
            }
        }
    }

    /// API 키를 읽을 관례적인 환경 변수
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            ProviderId::Server | ProviderId::Ollama => None,
            ProviderId::OpenAi => Some("OPENAI_API_KEY"),
            ProviderId::Anthropic => Some("ANTHROPIC_API_KEY"),
            ProviderId::Gemini => Some("GEMINI_API_KEY"),
            ProviderId::Groq => Some("GROQ_API_KEY"),
            ProviderId::Mistral => Some("MISTRAL_API_KEY"),
            ProviderId::DeepSeek => Some("DEEPSEEK_API_KEY"),
            ProviderId::OpenRouter => Some("OPENROUTER_API_KEY"),
            ProviderId::Cohere => Some("COHERE_API_KEY"),
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider factory for creating AI providers
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create the adapter for a provider id
    ///
    /// Every `ProviderId` maps to exactly one adapter, so this never fails.
    pub fn create(id: ProviderId) -> Arc<dyn AiProvider> {
        match id {
            ProviderId::Server => Arc::new(ServerProvider::new()),
            ProviderId::Ollama => Arc::new(OllamaProvider::new()),
            ProviderId::OpenAi => Arc::new(OpenAiCompatibleProvider::openai()),
            ProviderId::Anthropic => Arc::new(AnthropicProvider::new()),
            ProviderId::Gemini => Arc::new(GeminiProvider::new()),
            ProviderId::Groq => Arc::new(OpenAiCompatibleProvider::groq()),
            ProviderId::Mistral => Arc::new(OpenAiCompatibleProvider::mistral()),
            ProviderId::DeepSeek => Arc::new(OpenAiCompatibleProvider::deepseek()),
            ProviderId::OpenRouter => Arc::new(OpenAiCompatibleProvider::openrouter()),
            ProviderId::Cohere => Arc::new(CohereProvider::new()),
        }
    }

    /// Create the adapter for a configured provider name, falling back to the managed service
    pub fn create_by_name(provider_name: Option<&str>) -> Arc<dyn AiProvider> {
        Self::create(ProviderId::resolve(provider_name))
    }

    /// Get a list of all supported provider names
    pub fn supported_providers() -> Vec<&'static str> {
        ProviderId::ALL.iter().map(|id| id.as_str()).collect()
    }

    /// Check if a provider name is supported
    pub fn is_supported(provider_name: &str) -> bool {
        ProviderId::parse(provider_name).is_some()
    }
}
