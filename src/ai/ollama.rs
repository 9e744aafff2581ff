use crate::ai::{
    chat_messages, AiProvider, AuthScheme, GatewayRequest, ModelPolicy, ProviderId,
    DEFAULT_TEMPERATURE, LOCAL_TIMEOUT,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// 자체 호스팅 Ollama 데몬 (인증 없음, 모델 이름 필수)
pub struct OllamaProvider;

impl OllamaProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for OllamaProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Ollama
    }

    fn auth(&self) -> AuthScheme {
        AuthScheme::None
    }

    fn model_policy(&self) -> ModelPolicy {
        ModelPolicy::Required
    }

    fn default_base_url(&self) -> Option<&'static str> {
        Some(DEFAULT_OLLAMA_URL)
    }

    fn timeout(&self) -> Duration {
        LOCAL_TIMEOUT
    }

    fn endpoint(&self, base_url: &str, _model: Option<&str>) -> String {
        format!("{}/api/chat", base_url)
    }

    fn request_body(&self, request: &GatewayRequest, model: Option<&str>) -> Value {
        json!({
            "model": model,
            "messages": chat_messages(request),
            "stream": false,
            "options": { "temperature": DEFAULT_TEMPERATURE },
        })
    }

    fn extract_text(&self, body: &Value) -> Option<String> {
        body["message"]["content"].as_str().map(str::to_string)
    }
}
