use crate::ai::response_processor::{EmptyStructuredOutput, ParsedResponse, StructuredOutput};
use crate::ai::TaskKind;
use colored::*;

/// label과 content 사이 최소 간격
pub const GUTTER: usize = 2;

/// plain 채널에서 이어지는 줄 앞에 붙는 들여쓰기
pub const PLAIN_CONTINUATION: &str = "  ";

/// 같은 응답에서 만든 두 출력 채널
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    /// 터미널 표시용 (색상, 정렬)
    pub display: String,
    /// 클립보드/재사용용 (스타일 없음)
    ///
    /// 레코드마다 `label: content` 한 줄로 시작하고, content의 나머지 줄은
    /// `PLAIN_CONTINUATION`으로 들여씁니다. label은 공백으로 시작하지 않으므로
    /// 들여쓴 줄은 항상 앞 레코드의 content에 속합니다.
    pub plain: String,
}

/// 작업 종류별 표시 스타일
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStyle {
    pub label: Color,
    pub label_bold: bool,
    pub content: Option<Color>,
}

impl RenderStyle {
    pub fn for_kind(kind: TaskKind) -> Self {
        let (label, label_bold, content) = match kind {
            TaskKind::Generate => (Color::Green, true, None),
            TaskKind::Explain => (Color::Cyan, true, None),
            TaskKind::Teach => (Color::Magenta, true, None),
            TaskKind::Examples => (Color::Green, false, Some(Color::BrightBlack)),
            TaskKind::Improve => (Color::Yellow, true, None),
            TaskKind::Convert => (Color::Blue, true, None),
            TaskKind::Fix => (Color::Green, true, None),
            TaskKind::DiagnoseError => (Color::Red, true, None),
        };
        Self {
            label,
            label_bold,
            content,
        }
    }

    fn paint_label(&self, label: &str) -> ColoredString {
        let styled = label.color(self.label);
        if self.label_bold {
            styled.bold()
        } else {
            styled
        }
    }

    fn paint_content(&self, content: &str) -> ColoredString {
        match self.content {
            Some(color) => content.color(color),
            None => content.normal(),
        }
    }
}

/// 파싱된 응답을 표시용/일반 텍스트 두 채널로 렌더링
pub struct Renderer;

impl Renderer {
    pub fn render(
        output: &StructuredOutput,
        kind: TaskKind,
    ) -> Result<RenderedOutput, EmptyStructuredOutput> {
        match output {
            StructuredOutput::Records(parsed) => {
                Self::render_records(parsed, RenderStyle::for_kind(kind))
            }
            StructuredOutput::Commands(commands) => Self::render_commands(commands),
        }
    }

    /// label을 가장 긴 label 폭 + GUTTER로 맞춰 한 줄에 레코드 하나씩 출력
    pub fn render_records(
        parsed: &ParsedResponse,
        style: RenderStyle,
    ) -> Result<RenderedOutput, EmptyStructuredOutput> {
        if parsed.is_empty() {
            // 빈 응답은 빈 문자열이 아니라 실패로 처리
            return Err(EmptyStructuredOutput::records());
        }

        let column = parsed.max_label_width() + GUTTER;
        let indent = " ".repeat(column);

        let mut display = Vec::with_capacity(parsed.len());
        let mut plain = Vec::with_capacity(parsed.len());

        for record in parsed.records() {
            let padding = " ".repeat(column - record.label_width());

            // 여러 줄 content는 이어지는 줄을 content 열에 맞춤
            let mut lines = record.content.lines();
            let first = lines.next().unwrap_or_default();
            let mut line = format!(
                "{}{}{}",
                style.paint_label(&record.label),
                padding,
                style.paint_content(first)
            );
            for rest in lines {
                line.push('\n');
                line.push_str(&indent);
                line.push_str(&style.paint_content(rest).to_string());
            }
            display.push(line);

            // 이어지는 줄은 들여써서 새 레코드로 읽히지 않게 함
            let content = record
                .content
                .lines()
                .collect::<Vec<_>>()
                .join(&format!("\n{}", PLAIN_CONTINUATION));
            plain.push(format!("{}: {}", record.label, content));
        }

        Ok(RenderedOutput {
            display: display.join("\n"),
            plain: plain.join("\n"),
        })
    }

    /// `generate` 결과: 1부터 번호를 매긴 명령어 목록
    pub fn render_commands(commands: &[String]) -> Result<RenderedOutput, EmptyStructuredOutput> {
        if commands.is_empty() {
            return Err(EmptyStructuredOutput::commands());
        }

        let display = commands
            .iter()
            .enumerate()
            .map(|(idx, command)| {
                format!(
                    "{} {}",
                    format!("{}.", idx + 1).dimmed(),
                    command.green().bold()
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        Ok(RenderedOutput {
            display,
            plain: commands.join("\n"),
        })
    }
}
