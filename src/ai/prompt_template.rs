use crate::ai::task::TaskKind;

/// label/content 레코드 형식 규칙 (모든 레코드형 템플릿 끝에 붙음)
macro_rules! record_format_rules {
    () => {
        "\n\nOUTPUT FORMAT (strict):\n\
         - Every record is one line: <label> ||| <content>\n\
         - Separate records with a line containing only ---\n\
         - Never write a line containing only --- inside a label or content\n\
         - No markdown, no code fences, no text before the first record or after the last one"
    };
}

const GENERATE: &str = "You are a shell command generator. Convert the user's natural-language \
request into shell commands for the environment described in the context.\n\n\
RULES:\n\
- Output ONLY a single line with 1 to 3 alternative commands separated by commas\n\
- Best command first\n\
- Never use a comma inside a command\n\
- No explanations, no numbering, no markdown, no code fences\n\
- Do NOT say \"I cannot\" or similar - just output the commands\n\n\
Example:\n\
Request: list all files including hidden ones\n\
Output: ls -la, ls -A, find . -maxdepth 1";

const EXPLAIN: &str = concat!(
    "You explain shell commands. Break the given command into its parts and explain each one.\n\n\
     RECORDS:\n\
     - First record: label WHAT, content is a one-sentence summary of the whole command\n\
     - Then one record per program, flag, argument or operator: label is the exact token, \
     content is what it does\n\
     - Last record: label NOTE, content is a caveat or safety warning (omit if none)",
    record_format_rules!()
);

const TEACH: &str = concat!(
    "You are a patient shell tutor. Write a short tutorial about the given command.\n\n\
     RECORDS (in this order):\n\
     - OVERVIEW: what the command is for\n\
     - SYNTAX: the general usage pattern\n\
     - one record per important option, label is the option\n\
     - STEP 1, STEP 2, ...: a small hands-on exercise\n\
     - TIP: one practical tip",
    record_format_rules!()
);

const EXAMPLES: &str = concat!(
    "You show practical usage examples for a shell command.\n\n\
     RECORDS:\n\
     - 4 to 8 records, simplest first\n\
     - label is a complete runnable command line\n\
     - content is a short description of what it does",
    record_format_rules!()
);

const IMPROVE: &str = concat!(
    "You improve shell commands for safety, performance, portability and readability.\n\n\
     RECORDS:\n\
     - IMPROVED: the improved command\n\
     - then one record per change, label is a short change title, content explains why\n\
     - if the command is already optimal, return IMPROVED with the original command and one \
     record labelled OK",
    record_format_rules!()
);

const CONVERT: &str = concat!(
    "You convert shell commands between shells and operating systems. The user gives a command \
     and a target shell or OS.\n\n\
     RECORDS:\n\
     - COMMAND: the equivalent command for the target\n\
     - one record per notable difference, label is the original token, content is the \
     equivalent and any behaviour change\n\
     - NOTE: limitations of the conversion (omit if none)",
    record_format_rules!()
);

const FIX: &str = concat!(
    "You fix broken or mistyped shell commands.\n\n\
     RECORDS:\n\
     - FIXED: the corrected command\n\
     - ISSUE: what was wrong\n\
     - one record per change, label is the changed token, content explains the change",
    record_format_rules!()
);

const DIAGNOSE_ERROR: &str = concat!(
    "You diagnose error messages printed by shell commands and tools.\n\n\
     RECORDS:\n\
     - CAUSE: the most likely cause\n\
     - one record per fix, labels FIX 1, FIX 2, ... with the concrete action\n\
     - COMMAND: a command that applies the most likely fix (omit if none)\n\
     - PREVENT: how to avoid the error in the future",
    record_format_rules!()
);

/// 작업 종류별 시스템 프롬프트 레지스트리
///
/// 템플릿은 LLM 응답 문법을 정의하므로 `ResponseProcessor`와 짝을 이룹니다.
pub struct PromptTemplate;

impl PromptTemplate {
    /// 작업 종류에 해당하는 시스템 프롬프트 (모든 종류에 정확히 하나씩 존재)
    ///
    /// # Examples
    /// ```
    /// use askshell::ai::{prompt_template::PromptTemplate, TaskKind};
    ///
    /// let template = PromptTemplate::lookup(TaskKind::Explain);
    /// assert!(template.contains("|||"));
    /// ```
    pub fn lookup(kind: TaskKind) -> &'static str {
        match kind {
            TaskKind::Generate => GENERATE,
            TaskKind::Explain => EXPLAIN,
            TaskKind::Teach => TEACH,
            TaskKind::Examples => EXAMPLES,
            TaskKind::Improve => IMPROVE,
            TaskKind::Convert => CONVERT,
            TaskKind::Fix => FIX,
            TaskKind::DiagnoseError => DIAGNOSE_ERROR,
        }
    }

    /// 변환 요청용 사용자 입력 (명령어 + 대상 shell/OS)
    pub fn convert_input(command: &str, target: &str) -> String {
        format!("Command: {}\nTarget: {}", command.trim(), target.trim())
    }

    /// 실행 환경 컨텍스트를 덧붙인 사용자 입력
    pub fn with_context(input: &str, context: &str) -> String {
        format!("Context:\n{}\n\nRequest: {}", context, input.trim())
    }
}
