use crate::ai::factory::{ProviderFactory, ProviderId};
use crate::ai::prompt_template::PromptTemplate;
use crate::ai::task::TaskKind;
use crate::ai::transport::{HttpReply, ReqwestTransport, Transport, TransportError};
use crate::ai::non_empty;
use crate::error::Result;
use futures::FutureExt;
use serde_json::Value;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// 에러 메시지로 옮길 upstream 본문 최대 길이
const MAX_UPSTREAM_MESSAGE: usize = 300;

/// 게이트웨이 실패 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidRequest,
    MissingCredential,
    MissingModel,
    Unauthorized,
    Forbidden,
    RateLimited,
    Unreachable,
    Timeout,
    UpstreamError,
    EmptyReply,
    EmptyStructuredOutput,
    InternalError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidRequest => "InvalidRequest",
            ErrorKind::MissingCredential => "MissingCredential",
            ErrorKind::MissingModel => "MissingModel",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::RateLimited => "RateLimited",
            ErrorKind::Unreachable => "Unreachable",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::UpstreamError => "UpstreamError",
            ErrorKind::EmptyReply => "EmptyReply",
            ErrorKind::EmptyStructuredOutput => "EmptyStructuredOutput",
            ErrorKind::InternalError => "InternalError",
        }
    }

    /// 2xx가 아닌 HTTP 상태 코드 분류
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            429 => ErrorKind::RateLimited,
            _ => ErrorKind::UpstreamError,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 실패 결과 (어느 provider/model에서 실패했는지 항상 포함)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
    pub provider: ProviderId,
    pub model: Option<String>,
}

impl Failure {
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        provider: ProviderId,
        model: Option<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            provider,
            model,
        }
    }

    /// `provider/model` 형식 출처 표기
    pub fn origin(&self) -> String {
        match &self.model {
            Some(model) => format!("{}/{}", self.provider, model),
            None => self.provider.to_string(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.origin(), self.kind, self.message)
    }
}

impl std::error::Error for Failure {}

/// 성공 응답 (텍스트는 비어 있지 않음)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub provider: ProviderId,
    pub model: Option<String>,
}

impl Reply {
    /// 같은 provider/model 정보를 가진 실패로 변환 (응답 후처리 실패용)
    pub fn failure(&self, kind: ErrorKind, message: impl Into<String>) -> Failure {
        Failure::new(kind, message, self.provider, self.model.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayResponse {
    Success(Reply),
    Failure(Failure),
}

impl GatewayResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, GatewayResponse::Success(_))
    }

    pub fn failure_kind(&self) -> Option<ErrorKind> {
        match self {
            GatewayResponse::Success(_) => None,
            GatewayResponse::Failure(failure) => Some(failure.kind),
        }
    }

    pub fn into_result(self) -> std::result::Result<Reply, Failure> {
        match self {
            GatewayResponse::Success(reply) => Ok(reply),
            GatewayResponse::Failure(failure) => Err(failure),
        }
    }
}

/// 호출 시점의 provider 설정 스냅샷
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderConfig {
    pub provider_id: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub auth_token: Option<String>,
    pub timeout: Option<Duration>,
}

impl ProviderConfig {
    pub fn for_provider(provider_id: impl Into<String>) -> Self {
        Self {
            provider_id: Some(provider_id.into()),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_auth_token(mut self, auth_token: impl Into<String>) -> Self {
        self.auth_token = Some(auth_token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// 시스템 프롬프트 + 사용자 프롬프트 (둘 다 비어 있지 않음)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayRequest {
    system_prompt: String,
    user_prompt: String,
}

impl GatewayRequest {
    pub fn new(
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> std::result::Result<Self, &'static str> {
        let system_prompt = system_prompt.into();
        let user_prompt = user_prompt.into();

        if system_prompt.trim().is_empty() {
            return Err("system prompt is empty");
        }
        if user_prompt.trim().is_empty() {
            return Err("input is empty");
        }

        Ok(Self {
            system_prompt,
            user_prompt,
        })
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn user_prompt(&self) -> &str {
        &self.user_prompt
    }
}

/// 게이트웨이 디스패처
///
/// 작업 종류로 템플릿을 고르고, 설정 스냅샷으로 provider를 골라 한 번 호출합니다.
/// 재시도는 하지 않으며 첫 번째 실패를 그대로 돌려줍니다.
pub struct Gateway {
    transport: Arc<dyn Transport>,
}

impl Gateway {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// reqwest 전송을 사용하는 기본 게이트웨이
    pub fn with_default_transport() -> Result<Self> {
        Ok(Self::new(Arc::new(ReqwestTransport::new()?)))
    }

    /// 작업 요청 하나를 처리 (실패도 `GatewayResponse::Failure`로 반환)
    pub async fn dispatch(
        &self,
        kind: TaskKind,
        user_input: &str,
        config: &ProviderConfig,
    ) -> GatewayResponse {
        let provider_id = ProviderId::resolve(config.provider_id.as_deref());
        let started = Instant::now();

        let outcome = AssertUnwindSafe(self.dispatch_inner(kind, user_input, config, provider_id))
            .catch_unwind()
            .await;

        let response = outcome.unwrap_or_else(|panic| {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            GatewayResponse::Failure(Failure::new(
                ErrorKind::InternalError,
                format!("unexpected internal error: {}", reason),
                provider_id,
                non_empty(config.model.as_deref()).map(str::to_string),
            ))
        });

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &response {
            GatewayResponse::Success(reply) => debug!(
                task = %kind,
                provider = %reply.provider,
                model = reply.model.as_deref().unwrap_or("-"),
                elapsed_ms,
                "dispatch succeeded"
            ),
            GatewayResponse::Failure(failure) => warn!(
                task = %kind,
                provider = %failure.provider,
                model = failure.model.as_deref().unwrap_or("-"),
                kind = %failure.kind,
                elapsed_ms,
                "dispatch failed"
            ),
        }

        response
    }

    async fn dispatch_inner(
        &self,
        kind: TaskKind,
        user_input: &str,
        config: &ProviderConfig,
        provider_id: ProviderId,
    ) -> GatewayResponse {
        // 1. 입력 검증
        if user_input.trim().is_empty() {
            return GatewayResponse::Failure(Failure::new(
                ErrorKind::InvalidRequest,
                "input is empty",
                provider_id,
                non_empty(config.model.as_deref()).map(str::to_string),
            ));
        }

        // 2. 템플릿 선택
        let request = match GatewayRequest::new(PromptTemplate::lookup(kind), user_input.trim()) {
            Ok(request) => request,
            Err(reason) => {
                return GatewayResponse::Failure(Failure::new(
                    ErrorKind::InvalidRequest,
                    reason,
                    provider_id,
                    non_empty(config.model.as_deref()).map(str::to_string),
                ));
            }
        };

        // 3. provider 선택 후 호출
        let provider = ProviderFactory::create(provider_id);
        provider.invoke(self.transport.as_ref(), &request, config).await
    }
}

/// 전송 결과를 `GatewayResponse`로 정규화
pub(crate) fn normalize<F>(
    provider: ProviderId,
    model: Option<String>,
    timeout: Duration,
    outcome: std::result::Result<HttpReply, TransportError>,
    extract: F,
) -> GatewayResponse
where
    F: Fn(&Value) -> Option<String>,
{
    let fail = |kind: ErrorKind, message: String| {
        GatewayResponse::Failure(Failure::new(kind, message, provider, model.clone()))
    };

    let reply = match outcome {
        Ok(reply) => reply,
        Err(TransportError::Timeout) => {
            return fail(
                ErrorKind::Timeout,
                format!("no reply within {}s", timeout.as_secs()),
            );
        }
        Err(TransportError::Connect(reason)) => {
            return fail(ErrorKind::Unreachable, format!("cannot reach provider: {}", reason));
        }
        Err(TransportError::Other(reason)) => {
            return fail(ErrorKind::UpstreamError, format!("request failed: {}", reason));
        }
    };

    debug!(provider = %provider, status = reply.status, "received reply");

    if !reply.is_success() {
        let kind = ErrorKind::from_status(reply.status);
        let detail = upstream_message(&reply.body)
            .unwrap_or_else(|| "no error details in response".to_string());
        return fail(kind, format!("HTTP {}: {}", reply.status, detail));
    }

    let body: Value = match serde_json::from_str(&reply.body) {
        Ok(body) => body,
        Err(e) => return fail(ErrorKind::UpstreamError, format!("malformed response body: {}", e)),
    };

    match extract(&body) {
        None => fail(
            ErrorKind::UpstreamError,
            "unexpected response shape: no text field found".to_string(),
        ),
        Some(text) if text.trim().is_empty() => fail(
            ErrorKind::EmptyReply,
            "the model returned an empty reply".to_string(),
        ),
        Some(text) => GatewayResponse::Success(Reply {
            text: text.trim().to_string(),
            provider,
            model: model.clone(),
        }),
    }
}

/// 벤더 에러 본문에서 사람이 읽을 메시지 추출
fn upstream_message(body: &str) -> Option<String> {
    let message = match serde_json::from_str::<Value>(body) {
        Ok(json) => [
            &json["error"]["message"],
            &json["error"],
            &json["message"],
            &json["detail"],
        ]
        .into_iter()
        .find_map(|v| v.as_str())
        .map(str::to_string),
        Err(_) => non_empty(Some(body)).map(str::to_string),
    }?;

    let message = message.trim();
    if message.is_empty() {
        return None;
    }
    if message.chars().count() > MAX_UPSTREAM_MESSAGE {
        let truncated: String = message.chars().take(MAX_UPSTREAM_MESSAGE).collect();
        return Some(format!("{}…", truncated));
    }
    Some(message.to_string())
}
