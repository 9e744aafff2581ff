use crate::ai::TaskKind;
use crate::error::{AskShellError, Result};
use dialoguer::Input;

/// 명령줄에 입력이 없을 때 대화형으로 입력을 받는 수집기
pub struct InputPrompt;

impl InputPrompt {
    pub fn new() -> Self {
        Self
    }

    /// 작업 종류에 맞는 질문으로 한 줄 입력
    pub fn collect(&self, kind: TaskKind) -> Result<String> {
        let answer: String = Input::new()
            .with_prompt(kind.input_prompt())
            .allow_empty(true)
            .interact_text()
            .map_err(|_| AskShellError::UserCancelled)?;

        require_text(&answer)
    }

    /// `convert` 대상 셸/OS 입력
    pub fn collect_target(&self) -> Result<String> {
        let answer: String = Input::new()
            .with_prompt("Target shell or OS")
            .allow_empty(true)
            .interact_text()
            .map_err(|_| AskShellError::UserCancelled)?;

        require_text(&answer)
    }
}

impl Default for InputPrompt {
    fn default() -> Self {
        Self::new()
    }
}

/// 앞뒤 공백 제거 후 비어 있으면 `EmptyInput`
pub fn require_text(text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AskShellError::EmptyInput);
    }
    Ok(trimmed.to_string())
}
