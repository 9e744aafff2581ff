use crate::ai::{AiProvider, AuthScheme, Credential, GatewayRequest, ModelPolicy, ProviderId};
use async_trait::async_trait;
use serde_json::{json, Value};

/// 관리형 프록시 서비스
///
/// `serverUrl`과 로그인 토큰(`jwt`)으로 호출하며, 모델은 설정된 경우에만 전달합니다.
/// 설정된 provider를 알 수 없을 때도 이 백엔드를 사용합니다.
pub struct ServerProvider;

impl ServerProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ServerProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for ServerProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Server
    }

    fn auth(&self) -> AuthScheme {
        AuthScheme::Bearer(Credential::AuthToken)
    }

    fn model_policy(&self) -> ModelPolicy {
        ModelPolicy::Optional
    }

    fn default_base_url(&self) -> Option<&'static str> {
        None
    }

    fn endpoint(&self, base_url: &str, _model: Option<&str>) -> String {
        format!("{}/api/ai/query", base_url)
    }

    fn request_body(&self, request: &GatewayRequest, model: Option<&str>) -> Value {
        let mut body = json!({
            "systemPrompt": request.system_prompt(),
            "prompt": request.user_prompt(),
        });
        if let Some(model) = model {
            body["model"] = json!(model);
        }
        body
    }

    fn extract_text(&self, body: &Value) -> Option<String> {
        [&body["response"], &body["text"], &body["data"]["response"]]
            .into_iter()
            .find_map(|v| v.as_str())
            .map(str::to_string)
    }
}
