use crate::ai::Failure;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AskShellError {
    /// provider 호출 또는 응답 처리 실패 (provider/model 정보 포함)
    #[error("{0}")]
    Gateway(#[from] Failure),

    #[error("Input is empty. Please describe what you need.")]
    EmptyInput,

    #[error("User cancelled")]
    UserCancelled,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AskShellError>;
