use crate::ai::{
    join_text_blocks, AiProvider, AuthScheme, Credential, GatewayRequest, ModelPolicy, ProviderId,
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
use async_trait::async_trait;
use serde_json::{json, Value};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Messages API
pub struct AnthropicProvider;

impl AnthropicProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AnthropicProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for AnthropicProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    fn auth(&self) -> AuthScheme {
        AuthScheme::Header("x-api-key", Credential::ApiKey)
    }

    fn model_policy(&self) -> ModelPolicy {
        ModelPolicy::Default("claude-3-5-haiku-latest")
    }

    fn default_base_url(&self) -> Option<&'static str> {
        Some("https://api.anthropic.com")
    }

    fn endpoint(&self, base_url: &str, _model: Option<&str>) -> String {
        format!("{}/v1/messages", base_url)
    }

    fn request_body(&self, request: &GatewayRequest, model: Option<&str>) -> Value {
        // system은 messages가 아닌 최상위 필드, max_tokens는 필수
        json!({
            "model": model,
            "system": request.system_prompt(),
            "messages": [
                { "role": "user", "content": request.user_prompt() }
            ],
            "max_tokens": DEFAULT_MAX_TOKENS,
            "temperature": DEFAULT_TEMPERATURE,
        })
    }

    fn extra_headers(&self) -> Vec<(String, String)> {
        vec![("anthropic-version".to_string(), ANTHROPIC_VERSION.to_string())]
    }

    fn extract_text(&self, body: &Value) -> Option<String> {
        join_text_blocks(&body["content"])
    }
}
