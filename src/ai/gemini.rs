use crate::ai::{
    join_text_blocks, AiProvider, AuthScheme, Credential, GatewayRequest, ModelPolicy, ProviderId,
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
use async_trait::async_trait;
use serde_json::{json, Value};

const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Google Gemini generateContent API
pub struct GeminiProvider;

impl GeminiProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GeminiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for GeminiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    fn auth(&self) -> AuthScheme {
        AuthScheme::Header("x-goog-api-key", Credential::ApiKey)
    }

    fn model_policy(&self) -> ModelPolicy {
        ModelPolicy::Default(DEFAULT_MODEL)
    }

    fn default_base_url(&self) -> Option<&'static str> {
        Some("https://generativelanguage.googleapis.com")
    }

    fn endpoint(&self, base_url: &str, model: Option<&str>) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            base_url,
            model.unwrap_or(DEFAULT_MODEL)
        )
    }

    fn request_body(&self, request: &GatewayRequest, _model: Option<&str>) -> Value {
        json!({
            "systemInstruction": {
                "parts": [{ "text": request.system_prompt() }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.user_prompt() }]
            }],
            "generationConfig": {
                "temperature": DEFAULT_TEMPERATURE,
                "maxOutputTokens": DEFAULT_MAX_TOKENS,
            }
        })
    }

    fn extract_text(&self, body: &Value) -> Option<String> {
        let candidate = body["candidates"].get(0)?;
        // 안전 필터로 차단되면 content 없이 finishReason만 옴
        match candidate.get("content") {
            Some(content) => join_text_blocks(&content["parts"]).or(Some(String::new())),
            None => Some(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::transport::MockTransport;
    use crate::ai::{ErrorKind, ProviderConfig};

    #[test]
    fn test_provider_creation() {
        let provider = GeminiProvider::new();
        assert_eq!(provider.id(), ProviderId::Gemini);
        assert_eq!(
            provider.endpoint("https://g.example", Some("gemini-pro")),
            "https://g.example/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn test_extract_text() {
        let provider = GeminiProvider::new();
        let body = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "ls -la, "}, {"text": "ls -A"}]}
            }]
        });
        assert_eq!(provider.extract_text(&body), Some("ls -la, ls -A".to_string()));

        let blocked = json!({"candidates": [{"finishReason": "SAFETY"}]});
        assert_eq!(provider.extract_text(&blocked), Some(String::new()));

        assert_eq!(provider.extract_text(&json!({"promptFeedback": {}})), None);
    }

    #[tokio::test]
    async fn test_safety_block_is_empty_reply() {
        let transport = MockTransport::replying(
            200,
            json!({"candidates": [{"finishReason": "SAFETY"}]}).to_string(),
        );
        let config = ProviderConfig::for_provider("gemini").with_api_key("g-key");

        let response = GeminiProvider::new()
            .invoke(&transport, &GatewayRequest::new("s", "rm -rf /").unwrap(), &config)
            .await;

        assert_eq!(response.failure_kind(), Some(ErrorKind::EmptyReply));
        let sent = transport.last_request().unwrap();
        assert!(sent.headers.contains(&("x-goog-api-key".to_string(), "g-key".to_string())));
        assert!(sent.url.ends_with("/models/gemini-1.5-flash:generateContent"));
    }
}
