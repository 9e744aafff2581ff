use crate::ui::render::RenderedOutput;
use colored::*;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// 클립보드 복사에 쓰는 플랫폼 도구
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipboardTool {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

/// 시도 순서대로 나열한 후보 도구
pub const CLIPBOARD_TOOLS: [ClipboardTool; 5] = [
    ClipboardTool { program: "pbcopy", args: &[] },
    ClipboardTool { program: "wl-copy", args: &[] },
    ClipboardTool { program: "xclip", args: &["-selection", "clipboard"] },
    ClipboardTool { program: "xsel", args: &["--clipboard", "--input"] },
    ClipboardTool { program: "clip", args: &[] },
];

impl ClipboardTool {
    /// 도구 stdin으로 텍스트를 넘기고 정상 종료 여부 확인
    pub async fn copy(&self, text: &str) -> std::io::Result<bool> {
        let mut child = Command::new(self.program)
            .args(self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        Ok(child.wait().await?.success())
    }
}

/// 렌더링 결과를 stdout과 클립보드로 내보내는 출력 대상
pub struct OutputSink {
    plain_only: bool,
    copy_to_clipboard: bool,
    tools: Vec<ClipboardTool>,
}

impl OutputSink {
    pub fn new(plain_only: bool, copy_to_clipboard: bool) -> Self {
        Self {
            plain_only,
            copy_to_clipboard,
            tools: CLIPBOARD_TOOLS.to_vec(),
        }
    }

    /// 후보 도구 목록 교체
    pub fn with_tools(mut self, tools: Vec<ClipboardTool>) -> Self {
        self.tools = tools;
        self
    }

    /// stdout에 쓸 텍스트 (`--plain`이면 일반 텍스트 채널)
    pub fn screen_text<'a>(&self, output: &'a RenderedOutput) -> &'a str {
        if self.plain_only {
            &output.plain
        } else {
            &output.display
        }
    }

    /// 결과 출력 후 클립보드 복사 시도 (복사 실패는 경고만 출력)
    pub async fn emit(&self, output: &RenderedOutput) {
        println!("{}", self.screen_text(output));

        if !self.copy_to_clipboard {
            return;
        }

        if self.copy(&output.plain).await {
            eprintln!("{}", "✓ Copied to clipboard".dimmed());
        } else {
            eprintln!(
                "{}",
                "⚠ Could not copy to clipboard (install pbcopy, wl-copy, xclip or xsel)".yellow()
            );
        }
    }

    /// 사용 가능한 첫 번째 도구로 복사 (성공 여부 반환)
    pub async fn copy(&self, text: &str) -> bool {
        for tool in &self.tools {
            match tool.copy(text).await {
                Ok(true) => {
                    debug!(tool = tool.program, "copied to clipboard");
                    return true;
                }
                Ok(false) => debug!(tool = tool.program, "clipboard tool exited with failure"),
                Err(e) => debug!(tool = tool.program, error = %e, "clipboard tool unavailable"),
            }
        }
        false
    }
}
