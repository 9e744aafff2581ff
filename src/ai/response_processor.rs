use crate::ai::task::TaskKind;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

/// 레코드 구분자 (단독 줄)
pub const RECORD_SEPARATOR: &str = "---";

/// label/content 구분자 (첫 번째 것만 사용)
pub const FIELD_SEPARATOR: &str = "|||";

/// 사전 컴파일된 정규표현식: 구분자만 있는 줄 (앞뒤 공백 허용)
static RECORD_SEPARATOR_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?m)^[ \t]*{}[ \t]*\r?$",
        regex::escape(RECORD_SEPARATOR)
    ))
    .unwrap()
});

/// 응답에서 유효한 레코드나 명령어를 하나도 얻지 못함
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("the model replied without any usable {expected}")]
pub struct EmptyStructuredOutput {
    expected: &'static str,
}

impl EmptyStructuredOutput {
    pub fn records() -> Self {
        Self {
            expected: "`label ||| content` records",
        }
    }

    pub fn commands() -> Self {
        Self {
            expected: "commands",
        }
    }
}

/// label/content 레코드 하나 (둘 다 trim 후 비어 있지 않음)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    pub label: String,
    pub content: String,
}

impl ParsedRecord {
    /// 빈 필드가 있으면 `None`
    pub fn new(label: &str, content: &str) -> Option<Self> {
        let label = label.trim();
        let content = content.trim();
        if label.is_empty() || content.is_empty() {
            return None;
        }
        Some(Self {
            label: label.to_string(),
            content: content.to_string(),
        })
    }

    /// 터미널에 보이는 label 폭
    pub fn label_width(&self) -> usize {
        UnicodeWidthStr::width(self.label.as_str())
    }
}

/// 응답 원문 순서를 유지한 레코드 목록
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedResponse {
    records: Vec<ParsedRecord>,
}

impl ParsedResponse {
    pub fn from_records(records: Vec<ParsedRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ParsedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 가장 긴 label 폭 (정렬 기준)
    pub fn max_label_width(&self) -> usize {
        self.records
            .iter()
            .map(ParsedRecord::label_width)
            .max()
            .unwrap_or(0)
    }
}

/// 작업 종류에 따라 파싱된 응답
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredOutput {
    Records(ParsedResponse),
    Commands(Vec<String>),
}

/// LLM 응답 원문을 구조화된 결과로 변환하는 공통 모듈
pub struct ResponseProcessor;

impl ResponseProcessor {
    /// 작업 종류에 맞는 문법으로 파싱
    ///
    /// # Examples
    /// ```
    /// use askshell::ai::response_processor::{ResponseProcessor, StructuredOutput};
    /// use askshell::ai::TaskKind;
    ///
    /// let output = ResponseProcessor::process("ls -la, ls -A", TaskKind::Generate).unwrap();
    /// assert_eq!(
    ///     output,
    ///     StructuredOutput::Commands(vec!["ls -la".to_string(), "ls -A".to_string()])
    /// );
    /// ```
    pub fn process(raw: &str, kind: TaskKind) -> Result<StructuredOutput, EmptyStructuredOutput> {
        if kind.expects_command_list() {
            Self::parse_list(raw).map(StructuredOutput::Commands)
        } else {
            Self::parse(raw).map(StructuredOutput::Records)
        }
    }

    /// `<label> ||| <content>` 레코드를 `---` 줄 기준으로 분리
    ///
    /// 필드가 둘로 나뉘지 않거나 한쪽이 비어 있는 조각은 버립니다.
    pub fn parse(raw: &str) -> Result<ParsedResponse, EmptyStructuredOutput> {
        let records: Vec<ParsedRecord> = RECORD_SEPARATOR_LINE
            .split(raw)
            .map(str::trim)
            .filter(|chunk| !chunk.is_empty())
            .filter_map(|chunk| {
                // 첫 번째 구분자에서만 분리 (content 안의 `|||`는 그대로 유지)
                let (label, content) = chunk.split_once(FIELD_SEPARATOR)?;
                ParsedRecord::new(label, content)
            })
            .collect();

        if records.is_empty() {
            return Err(EmptyStructuredOutput::records());
        }

        Ok(ParsedResponse { records })
    }

    /// `generate` 응답: 쉼표로 구분된 명령어 목록
    pub fn parse_list(raw: &str) -> Result<Vec<String>, EmptyStructuredOutput> {
        let commands: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|command| !command.is_empty())
            .map(str::to_string)
            .collect();

        if commands.is_empty() {
            return Err(EmptyStructuredOutput::commands());
        }

        Ok(commands)
    }
}
