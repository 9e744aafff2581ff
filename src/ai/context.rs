use std::env;
use std::path::Path;

/// 명령어 생성에 필요한 실행 환경 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    pub os: String,
    pub shell: String,
    pub cwd: String,
}

impl ExecutionContext {
    /// 현재 프로세스 환경에서 수집
    pub fn detect() -> Self {
        let cwd = env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        let shell = env::var("SHELL")
            .ok()
            .and_then(|path| {
                Path::new(&path)
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .or_else(|| env::var("ComSpec").ok().map(|_| "cmd".to_string()))
            .unwrap_or_else(|| "bash".to_string());

        Self {
            os: env::consts::OS.to_string(),
            shell,
            cwd,
        }
    }

    pub fn describe(&self) -> String {
        format!(
            "OS: {}\n\
             Shell: {}\n\
             Current directory: {}",
            self.os, self.shell, self.cwd
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_context() {
        let context = ExecutionContext::detect();
        assert_eq!(context.os, env::consts::OS);
        assert!(!context.shell.is_empty());
    }

    #[test]
    fn test_describe() {
        let context = ExecutionContext {
            os: "linux".to_string(),
            shell: "zsh".to_string(),
            cwd: "/home/user".to_string(),
        };
        let text = context.describe();
        assert!(text.contains("OS: linux"));
        assert!(text.contains("Shell: zsh"));
        assert!(text.contains("Current directory: /home/user"));
    }
}
