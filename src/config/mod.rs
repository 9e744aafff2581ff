use crate::ai::ollama::DEFAULT_OLLAMA_URL;
use crate::ai::{ProviderConfig, ProviderId};
use crate::error::{AskShellError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// 설정 파일 경로를 덮어쓰는 환경 변수
pub const CONFIG_PATH_ENV: &str = "ASKSHELL_CONFIG";

/// askshell 사용자 설정
///
/// 설정 파일은 ~/.askshell/config.toml에 저장됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// 사용할 provider (server, ollama, openai, ...)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// 관리형 서비스 주소
    #[serde(default, alias = "serverUrl", skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,

    /// 호스팅 provider API 키
    #[serde(default, alias = "apiKey", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// 관리형 서비스 로그인 토큰
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt: Option<String>,

    /// Ollama 데몬 주소
    #[serde(default = "default_ollama_url", alias = "ollamaUrl")]
    pub ollama_url: String,

    /// 모델 이름 (없으면 provider 기본값)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// 요청 타임아웃 (초)
    #[serde(default, alias = "timeoutSecs", skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// 결과를 클립보드에 복사할지 여부
    #[serde(default = "default_copy_to_clipboard", alias = "copyToClipboard")]
    pub copy_to_clipboard: bool,
}

fn default_provider() -> String {
    ProviderId::FALLBACK.as_str().to_string()
}

fn default_ollama_url() -> String {
    DEFAULT_OLLAMA_URL.to_string()
}

fn default_copy_to_clipboard() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            server_url: None,
            api_key: None,
            jwt: None,
            ollama_url: default_ollama_url(),
            model: None,
            timeout_secs: None,
            copy_to_clipboard: default_copy_to_clipboard(),
        }
    }
}

/// `config get/set`에서 사용하는 설정 키
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Provider,
    ServerUrl,
    ApiKey,
    Jwt,
    OllamaUrl,
    Model,
    TimeoutSecs,
    CopyToClipboard,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 8] = [
        ConfigKey::Provider,
        ConfigKey::ServerUrl,
        ConfigKey::ApiKey,
        ConfigKey::Jwt,
        ConfigKey::OllamaUrl,
        ConfigKey::Model,
        ConfigKey::TimeoutSecs,
        ConfigKey::CopyToClipboard,
    ];

    /// 표시용 이름 (camelCase)
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::Provider => "provider",
            ConfigKey::ServerUrl => "serverUrl",
            ConfigKey::ApiKey => "apiKey",
            ConfigKey::Jwt => "jwt",
            ConfigKey::OllamaUrl => "ollamaUrl",
            ConfigKey::Model => "model",
            ConfigKey::TimeoutSecs => "timeoutSecs",
            ConfigKey::CopyToClipboard => "copyToClipboard",
        }
    }

    /// snake_case 파일 키
    pub fn file_key(&self) -> &'static str {
        match self {
            ConfigKey::Provider => "provider",
            ConfigKey::ServerUrl => "server_url",
            ConfigKey::ApiKey => "api_key",
            ConfigKey::Jwt => "jwt",
            ConfigKey::OllamaUrl => "ollama_url",
            ConfigKey::Model => "model",
            ConfigKey::TimeoutSecs => "timeout_secs",
            ConfigKey::CopyToClipboard => "copy_to_clipboard",
        }
    }

    /// camelCase 또는 snake_case 키 파싱
    pub fn parse(key: &str) -> Result<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == key || k.file_key() == key)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(ConfigKey::as_str).collect();
                AskShellError::ConfigError(format!(
                    "unknown key '{}' (expected one of: {})",
                    key,
                    known.join(", ")
                ))
            })
    }

    /// 목록 출력 시 가려야 하는 값인지
    pub fn is_secret(&self) -> bool {
        matches!(self, ConfigKey::ApiKey | ConfigKey::Jwt)
    }
}

impl Config {
    /// 설정 파일 경로 (`ASKSHELL_CONFIG` 우선)
    pub fn config_path() -> PathBuf {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".askshell")
            .join("config.toml")
    }

    /// 설정 파일에서 로드 (없으면 기본값 사용)
    ///
    /// # Examples
    /// ```no_run
    /// use askshell::config::Config;
    ///
    /// let config = Config::load().unwrap();
    /// println!("provider = {}", config.provider);
    /// ```
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        // 설정 파일이 없으면 기본값 반환
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            AskShellError::ConfigError(format!("invalid config file {}: {}", path.display(), e))
        })
    }

    /// 설정을 파일에 저장
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // 디렉토리가 없으면 생성
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| AskShellError::ConfigError(format!("failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)?;
        Ok(())
    }

    /// 키 하나의 값 (설정되지 않았으면 `None`)
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.value_of(ConfigKey::parse(key)?))
    }

    /// 키 하나를 변경 (빈 값은 선택 항목을 해제)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let key = ConfigKey::parse(key)?;
        let value = value.trim();
        let optional = || (!value.is_empty()).then(|| value.to_string());

        match key {
            ConfigKey::Provider => {
                self.provider = if value.is_empty() {
                    default_provider()
                } else {
                    value.to_ascii_lowercase()
                };
            }
            ConfigKey::ServerUrl => self.server_url = optional(),
            ConfigKey::ApiKey => self.api_key = optional(),
            ConfigKey::Jwt => self.jwt = optional(),
            ConfigKey::OllamaUrl => {
                self.ollama_url = optional().unwrap_or_else(default_ollama_url);
            }
            ConfigKey::Model => self.model = optional(),
            ConfigKey::TimeoutSecs => {
                self.timeout_secs = match value {
                    "" => None,
                    _ => match value.parse::<u64>() {
                        Ok(secs) if secs > 0 => Some(secs),
                        _ => {
                            return Err(AskShellError::ConfigError(format!(
                                "timeoutSecs must be a positive number of seconds, got '{}'",
                                value
                            )))
                        }
                    },
                };
            }
            ConfigKey::CopyToClipboard => {
                self.copy_to_clipboard = parse_bool(value).ok_or_else(|| {
                    AskShellError::ConfigError(format!(
                        "copyToClipboard must be true or false, got '{}'",
                        value
                    ))
                })?;
            }
        }

        Ok(())
    }

    /// 설정된 값 전체 (API 키와 토큰은 가림)
    pub fn get_all(&self) -> BTreeMap<String, String> {
        ConfigKey::ALL
            .into_iter()
            .filter_map(|key| {
                let value = self.value_of(key)?;
                let shown = if key.is_secret() { mask(&value) } else { value };
                Some((key.as_str().to_string(), shown))
            })
            .collect()
    }

    fn value_of(&self, key: ConfigKey) -> Option<String> {
        match key {
            ConfigKey::Provider => Some(self.provider.clone()),
            ConfigKey::ServerUrl => self.server_url.clone(),
            ConfigKey::ApiKey => self.api_key.clone(),
            ConfigKey::Jwt => self.jwt.clone(),
            ConfigKey::OllamaUrl => Some(self.ollama_url.clone()),
            ConfigKey::Model => self.model.clone(),
            ConfigKey::TimeoutSecs => self.timeout_secs.map(|s| s.to_string()),
            ConfigKey::CopyToClipboard => Some(self.copy_to_clipboard.to_string()),
        }
    }

    /// 호출 한 번에 사용할 provider 설정 스냅샷
    pub fn provider_config(
        &self,
        override_provider: Option<&str>,
        override_model: Option<&str>,
    ) -> ProviderConfig {
        self.provider_config_with(override_provider, override_model, |name| {
            env::var(name).ok()
        })
    }

    /// 환경 변수 조회 함수를 주입받는 버전
    pub fn provider_config_with<F>(
        &self,
        override_provider: Option<&str>,
        override_model: Option<&str>,
        lookup_env: F,
    ) -> ProviderConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let requested = override_provider
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(self.provider.as_str());
        let id = ProviderId::resolve(Some(requested));

        // 다른 provider로 바꿨으면 설정된 모델은 그 provider용이 아님
        let switched = ProviderId::resolve(Some(self.provider.as_str())) != id;
        let model = match override_model.map(str::trim).filter(|m| !m.is_empty()) {
            Some(model) => Some(model.to_string()),
            None if switched => None,
            None => self.model.clone(),
        };

        // 설정된 키도 설정된 provider용이므로 다른 provider에는 보내지 않음
        let configured_key = if switched { None } else { self.api_key.clone() };
        let api_key = configured_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| id.api_key_env().and_then(|name| lookup_env(name)))
            .filter(|k| !k.trim().is_empty());

        let base_url = match id {
            ProviderId::Server => self.server_url.clone(),
            ProviderId::Ollama => Some(self.ollama_url.clone()),
            _ => None,
        };

        ProviderConfig {
            provider_id: Some(requested.to_string()),
            api_key,
            model,
            base_url,
            auth_token: self.jwt.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

/// 비밀 값 마스킹 (끝 4자리만 표시)
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
