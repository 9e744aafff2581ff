pub mod anthropic;
pub mod cohere;
pub mod context;
pub mod factory;
pub mod gateway;
pub mod gemini;
pub mod ollama;
pub mod openai;
pub mod prompt_template;
pub mod response_processor;
pub mod server;
pub mod task;
pub mod transport;

pub use factory::{ProviderFactory, ProviderId};
pub use gateway::{ErrorKind, Failure, Gateway, GatewayRequest, GatewayResponse, ProviderConfig, Reply};
pub use task::TaskKind;

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use transport::{HttpRequest, Transport};

/// 호스팅 API 기본 요청 타임아웃
pub const HOSTED_TIMEOUT: Duration = Duration::from_secs(30);

/// 로컬 추론 데몬 기본 요청 타임아웃
pub const LOCAL_TIMEOUT: Duration = Duration::from_secs(120);

/// 전송 계층이 자체 타임아웃을 지키지 않을 때를 대비한 여유 시간
const TIMEOUT_GRACE: Duration = Duration::from_secs(2);

/// 기본 생성 파라미터
pub const DEFAULT_TEMPERATURE: f64 = 0.2;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// 인증 정보 출처
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
    /// 벤더 API 키 (`apiKey`)
    ApiKey,
    /// 관리형 서비스 로그인 토큰 (`jwt`)
    AuthToken,
}

impl Credential {
    pub fn config_key(&self) -> &'static str {
        match self {
            Credential::ApiKey => "apiKey",
            Credential::AuthToken => "jwt",
        }
    }

    fn read<'a>(&self, config: &'a ProviderConfig) -> Option<&'a str> {
        let value = match self {
            Credential::ApiKey => config.api_key.as_deref(),
            Credential::AuthToken => config.auth_token.as_deref(),
        };
        non_empty(value)
    }
}

/// provider별 인증 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// 인증 없음 (자체 호스팅 데몬)
    None,
    /// `Authorization: Bearer <credential>`
    Bearer(Credential),
    /// 임의 헤더 키에 credential을 그대로 전달
    Header(&'static str, Credential),
}

impl AuthScheme {
    fn credential(&self) -> Option<Credential> {
        match self {
            AuthScheme::None => None,
            AuthScheme::Bearer(credential) | AuthScheme::Header(_, credential) => Some(*credential),
        }
    }

    fn header(&self, secret: &str) -> Option<(String, String)> {
        match self {
            AuthScheme::None => None,
            AuthScheme::Bearer(_) => Some(("Authorization".to_string(), format!("Bearer {}", secret))),
            AuthScheme::Header(name, _) => Some((name.to_string(), secret.to_string())),
        }
    }
}

/// 모델 이름 요구 정책
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelPolicy {
    /// 설정이 없으면 provider 기본 모델 사용
    Default(&'static str),
    /// 반드시 설정되어야 함 (없으면 `MissingModel`)
    Required,
    /// 설정된 경우에만 전달
    Optional,
}

/// 사전 검사를 통과한 호출 대상
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub base_url: String,
    pub model: Option<String>,
    pub credential: Option<String>,
    pub timeout: Duration,
}

/// LLM 백엔드 공통 호출 계약
///
/// 각 provider는 요청 형식, 인증, 응답 텍스트 위치만 정의하고
/// 사전 검사, 전송, 에러 정규화는 `invoke` 기본 구현을 공유합니다.
#[async_trait]
pub trait AiProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    fn auth(&self) -> AuthScheme;

    fn model_policy(&self) -> ModelPolicy;

    /// 설정에 base URL이 없을 때 사용할 주소 (`None`이면 설정 필수)
    fn default_base_url(&self) -> Option<&'static str>;

    fn timeout(&self) -> Duration {
        HOSTED_TIMEOUT
    }

    fn endpoint(&self, base_url: &str, model: Option<&str>) -> String;

    fn request_body(&self, request: &GatewayRequest, model: Option<&str>) -> Value;

    /// 인증 외 추가 헤더
    fn extra_headers(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// 응답 본문에서 텍스트 추출
    ///
    /// 응답 구조가 예상과 다르면 `None`, 구조는 맞지만 텍스트가 없으면 빈 문자열을 반환합니다.
    fn extract_text(&self, body: &Value) -> Option<String>;

    /// 네트워크 호출 전 사전 검사 (모든 provider에 동일하게 적용)
    fn preflight(&self, config: &ProviderConfig) -> Result<Target, Failure> {
        let configured_model = non_empty(config.model.as_deref());

        let credential = match self.auth().credential() {
            Some(credential) => match credential.read(config) {
                Some(secret) => Some(secret.to_string()),
                None => {
                    return Err(Failure::new(
                        ErrorKind::MissingCredential,
                        format!(
                            "{} is not set. Run `askshell config set {} <value>`",
                            credential.config_key(),
                            credential.config_key()
                        ),
                        self.id(),
                        configured_model.map(str::to_string),
                    ));
                }
            },
            None => None,
        };

        let model = match self.model_policy() {
            ModelPolicy::Default(default) => Some(configured_model.unwrap_or(default).to_string()),
            ModelPolicy::Optional => configured_model.map(str::to_string),
            ModelPolicy::Required => match configured_model {
                Some(model) => Some(model.to_string()),
                None => {
                    return Err(Failure::new(
                        ErrorKind::MissingModel,
                        "model is not set. Run `askshell config set model <name>`",
                        self.id(),
                        None,
                    ));
                }
            },
        };

        let base_url = match non_empty(config.base_url.as_deref()).or(self.default_base_url()) {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => {
                return Err(Failure::new(
                    ErrorKind::MissingCredential,
                    "server URL is not set. Run `askshell config set serverUrl <url>`",
                    self.id(),
                    model,
                ));
            }
        };

        Ok(Target {
            base_url,
            model,
            credential,
            timeout: config.timeout.unwrap_or_else(|| self.timeout()),
        })
    }

    /// 요청 한 번을 보내고 결과를 `GatewayResponse`로 정규화 (panic 외에는 실패를 던지지 않음)
    async fn invoke(
        &self,
        transport: &dyn Transport,
        request: &GatewayRequest,
        config: &ProviderConfig,
    ) -> GatewayResponse {
        // 1. 사전 검사 (네트워크 호출 없음)
        let target = match self.preflight(config) {
            Ok(target) => target,
            Err(failure) => return GatewayResponse::Failure(failure),
        };

        // 2. provider 형식으로 요청 구성
        let mut headers = self.extra_headers();
        if let Some(secret) = target.credential.as_deref() {
            headers.extend(self.auth().header(secret));
        }
        let http_request = HttpRequest {
            url: self.endpoint(&target.base_url, target.model.as_deref()),
            headers,
            body: self.request_body(request, target.model.as_deref()),
            timeout: target.timeout,
        };
        debug!(provider = %self.id(), url = %http_request.url, "sending request");

        // 3. 전송 (전송 계층과 무관하게 타임아웃 보장)
        let outcome = match tokio::time::timeout(
            target.timeout + TIMEOUT_GRACE,
            transport.post_json(http_request),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(transport::TransportError::Timeout),
        };

        // 4. 응답 정규화
        gateway::normalize(self.id(), target.model, target.timeout, outcome, |body| {
            self.extract_text(body)
        })
    }
}

/// 앞뒤 공백을 제거한 뒤 비어 있지 않은 값만 반환
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// OpenAI 형식 메시지 배열 (system + user)
pub(crate) fn chat_messages(request: &GatewayRequest) -> Value {
    serde_json::json!([
        { "role": "system", "content": request.system_prompt() },
        { "role": "user", "content": request.user_prompt() },
    ])
}

/// 텍스트 블록 배열에서 `text` 필드를 이어 붙임 (배열이 아니면 `None`)
pub(crate) fn join_text_blocks(blocks: &Value) -> Option<String> {
    let blocks = blocks.as_array()?;
    Some(
        blocks
            .iter()
            .filter(|block| block["type"].as_str().map_or(true, |t| t == "text"))
            .filter_map(|block| block["text"].as_str())
            .collect::<Vec<_>>()
            .join(""),
    )
}
