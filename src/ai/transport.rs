use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

/// provider adapter가 만든 HTTP 요청 (항상 JSON POST)
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
    pub timeout: Duration,
}

/// 상태 코드와 원본 본문
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 응답을 받기 전에 발생한 전송 계층 실패
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

/// HTTP 전송 추상화 (테스트에서는 `MockTransport`로 대체)
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, request: HttpRequest) -> std::result::Result<HttpReply, TransportError>;
}

/// reqwest 기반 기본 전송
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("askshell/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_json(&self, request: HttpRequest) -> std::result::Result<HttpReply, TransportError> {
        let mut builder = self
            .http
            .post(&request.url)
            .timeout(request.timeout)
            .json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(classify_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify_reqwest_error)?;

        Ok(HttpReply { status, body })
    }
}

fn classify_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else {
        TransportError::Other(error.to_string())
    }
}

/// 미리 정해 둔 응답을 순서대로 돌려주는 전송 (호출 횟수와 요청 기록)
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<std::result::Result<HttpReply, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replying(status: u16, body: impl Into<String>) -> Self {
        let transport = Self::new();
        transport.push_reply(HttpReply::new(status, body));
        transport
    }

    pub fn failing(error: TransportError) -> Self {
        let transport = Self::new();
        transport.push_error(error);
        transport
    }

    /// 응답 전에 지연 (타임아웃 테스트용)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_reply(&self, reply: HttpReply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(Ok(reply));
        }
    }

    pub fn push_error(&self, error: TransportError) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(Err(error));
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests().pop()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_json(&self, request: HttpRequest) -> std::result::Result<HttpReply, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front())
            .unwrap_or_else(|| Err(TransportError::Other("no mock reply queued".to_string())))
    }
}
