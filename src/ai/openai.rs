use crate::ai::{
    chat_messages, AiProvider, AuthScheme, Credential, GatewayRequest, ModelPolicy, ProviderId,
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
use async_trait::async_trait;
use serde_json::{json, Value};

/// OpenAI Chat Completions 형식을 쓰는 호스팅 API
///
/// OpenAI, Groq, Mistral, DeepSeek, OpenRouter가 같은 요청/응답 형식을 공유하므로
/// 주소와 기본 모델만 다르게 설정합니다.
pub struct OpenAiCompatibleProvider {
    id: ProviderId,
    base_url: &'static str,
    default_model: &'static str,
    extra_headers: Vec<(String, String)>,
}

impl OpenAiCompatibleProvider {
    pub fn openai() -> Self {
        Self::new(ProviderId::OpenAi, "https://api.openai.com/v1", "gpt-4o-mini")
    }

    pub fn groq() -> Self {
        Self::new(
            ProviderId::Groq,
            "https://api.groq.com/openai/v1",
            "llama-3.1-8b-instant",
        )
    }

    pub fn mistral() -> Self {
        Self::new(
            ProviderId::Mistral,
            "https://api.mistral.ai/v1",
            "mistral-small-latest",
        )
    }

    pub fn deepseek() -> Self {
        Self::new(ProviderId::DeepSeek, "https://api.deepseek.com/v1", "deepseek-chat")
    }

    pub fn openrouter() -> Self {
        let mut provider = Self::new(
            ProviderId::OpenRouter,
            "https://openrouter.ai/api/v1",
            "openai/gpt-4o-mini",
        );
        // OpenRouter 앱 식별 헤더
        provider.extra_headers = vec![("X-Title".to_string(), "askshell".to_string())];
        provider
    }

    fn new(id: ProviderId, base_url: &'static str, default_model: &'static str) -> Self {
        Self {
            id,
            base_url,
            default_model,
            extra_headers: Vec::new(),
        }
    }
}

#[async_trait]
impl AiProvider for OpenAiCompatibleProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn auth(&self) -> AuthScheme {
        AuthScheme::Bearer(Credential::ApiKey)
    }

    fn model_policy(&self) -> ModelPolicy {
        ModelPolicy::Default(self.default_model)
    }

    fn default_base_url(&self) -> Option<&'static str> {
        Some(self.base_url)
    }

    fn endpoint(&self, base_url: &str, _model: Option<&str>) -> String {
        format!("{}/chat/completions", base_url)
    }

    fn request_body(&self, request: &GatewayRequest, model: Option<&str>) -> Value {
        json!({
            "model": model.unwrap_or(self.default_model),
            "messages": chat_messages(request),
            "temperature": DEFAULT_TEMPERATURE,
            "max_tokens": DEFAULT_MAX_TOKENS,
        })
    }

    fn extra_headers(&self) -> Vec<(String, String)> {
        self.extra_headers.clone()
    }

    fn extract_text(&self, body: &Value) -> Option<String> {
        let message = body["choices"].get(0)?.get("message")?;
        match &message["content"] {
            Value::String(text) => Some(text.clone()),
            Value::Null => Some(String::new()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::transport::MockTransport;
    use crate::ai::{ErrorKind, ProviderConfig};

    fn request() -> GatewayRequest {
        GatewayRequest::new("system rules", "list files").unwrap()
    }

    #[test]
    fn test_provider_creation() {
        assert_eq!(OpenAiCompatibleProvider::openai().id(), ProviderId::OpenAi);
        assert_eq!(OpenAiCompatibleProvider::groq().id(), ProviderId::Groq);
        assert_eq!(OpenAiCompatibleProvider::mistral().id(), ProviderId::Mistral);
        assert_eq!(OpenAiCompatibleProvider::deepseek().id(), ProviderId::DeepSeek);
        assert_eq!(OpenAiCompatibleProvider::openrouter().id(), ProviderId::OpenRouter);
    }

    #[test]
    fn test_request_body() {
        let provider = OpenAiCompatibleProvider::openai();
        let body = provider.request_body(&request(), Some("gpt-4o"));

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "system rules");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "list files");
        assert_eq!(body["max_tokens"], DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_extract_text() {
        let provider = OpenAiCompatibleProvider::openai();
        let body = json!({"choices": [{"message": {"content": "ls -la"}}]});
        assert_eq!(provider.extract_text(&body), Some("ls -la".to_string()));

        let body = json!({"choices": [{"message": {"content": null}}]});
        assert_eq!(provider.extract_text(&body), Some(String::new()));

        assert_eq!(provider.extract_text(&json!({"choices": []})), None);
        assert_eq!(provider.extract_text(&json!({"error": "x"})), None);
    }

    #[tokio::test]
    async fn test_invoke_uses_bearer_and_default_model() {
        let transport = MockTransport::replying(
            200,
            json!({"choices": [{"message": {"content": "ls"}}]}).to_string(),
        );
        let provider = OpenAiCompatibleProvider::groq();
        let config = ProviderConfig::for_provider("groq").with_api_key("gsk-1");

        let response = provider.invoke(&transport, &request(), &config).await;
        assert!(response.is_success());

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.url, "https://api.groq.com/openai/v1/chat/completions");
        assert!(sent
            .headers
            .contains(&("Authorization".to_string(), "Bearer gsk-1".to_string())));
        assert_eq!(sent.body["model"], "llama-3.1-8b-instant");
    }

    #[tokio::test]
    async fn test_openrouter_identification_headers() {
        let transport = MockTransport::replying(
            200,
            json!({"choices": [{"message": {"content": "ls"}}]}).to_string(),
        );
        let provider = OpenAiCompatibleProvider::openrouter();
        let config = ProviderConfig::for_provider("openrouter").with_api_key("or-1");

        provider.invoke(&transport, &request(), &config).await;

        let sent = transport.last_request().unwrap();
        assert!(sent.headers.iter().any(|(name, _)| name == "X-Title"));
    }

    #[tokio::test]
    async fn test_missing_key_and_blank_key() {
        let transport = MockTransport::new();
        let provider = OpenAiCompatibleProvider::openai();

        for config in [
            ProviderConfig::for_provider("openai"),
            ProviderConfig::for_provider("openai").with_api_key("   "),
        ] {
            let response = provider.invoke(&transport, &request(), &config).await;
            assert_eq!(response.failure_kind(), Some(ErrorKind::MissingCredential));
        }
        assert_eq!(transport.call_count(), 0);
    }
}
