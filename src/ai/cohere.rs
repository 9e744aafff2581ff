use crate::ai::{
    chat_messages, join_text_blocks, AiProvider, AuthScheme, Credential, GatewayRequest,
    ModelPolicy, ProviderId, DEFAULT_TEMPERATURE,
};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Cohere Chat v2 API
pub struct CohereProvider;

impl CohereProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CohereProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for CohereProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Cohere
    }

    fn auth(&self) -> AuthScheme {
        AuthScheme::Bearer(Credential::ApiKey)
    }

    fn model_policy(&self) -> ModelPolicy {
        ModelPolicy::Default("command-r")
    }

    fn default_base_url(&self) -> Option<&'static str> {
        Some("https://api.cohere.com")
    }

    fn endpoint(&self, base_url: &str, _model: Option<&str>) -> String {
        format!("{}/v2/chat", base_url)
    }

    fn request_body(&self, request: &GatewayRequest, model: Option<&str>) -> Value {
        json!({
            "model": model,
            "messages": chat_messages(request),
            "temperature": DEFAULT_TEMPERATURE,
        })
    }

    fn extract_text(&self, body: &Value) -> Option<String> {
        join_text_blocks(&body["message"]["content"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text() {
        let provider = CohereProvider::new();
        let body = json!({
            "message": {"role": "assistant", "content": [{"type": "text", "text": "ls -la"}]}
        });
        assert_eq!(provider.extract_text(&body), Some("ls -la".to_string()));
        assert_eq!(provider.extract_text(&json!({"text": "v1 shape"})), None);
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            CohereProvider::new().endpoint("https://api.cohere.com", None),
            "https://api.cohere.com/v2/chat"
        );
    }
}
