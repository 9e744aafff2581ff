use std::fmt;

/// 어시스턴트 작업 종류
///
/// 작업 종류마다 프롬프트 템플릿 하나와 렌더링 스타일 하나가 정해져 있습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Generate,
    Explain,
    Teach,
    Examples,
    Improve,
    Convert,
    Fix,
    DiagnoseError,
}

impl TaskKind {
    pub const ALL: [TaskKind; 8] = [
        TaskKind::Generate,
        TaskKind::Explain,
        TaskKind::Teach,
        TaskKind::Examples,
        TaskKind::Improve,
        TaskKind::Convert,
        TaskKind::Fix,
        TaskKind::DiagnoseError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Generate => "generate",
            TaskKind::Explain => "explain",
            TaskKind::Teach => "teach",
            TaskKind::Examples => "examples",
            TaskKind::Improve => "improve",
            TaskKind::Convert => "convert",
            TaskKind::Fix => "fix",
            TaskKind::DiagnoseError => "diagnose-error",
        }
    }

    /// `generate`만 label/content 레코드 대신 쉼표로 구분된 명령어 목록을 받습니다.
    pub fn expects_command_list(&self) -> bool {
        matches!(self, TaskKind::Generate)
    }

    /// 입력이 비어 있을 때 대화형으로 물어볼 질문
    pub fn input_prompt(&self) -> &'static str {
        match self {
            TaskKind::Generate => "What do you want to do",
            TaskKind::Explain => "Command to explain",
            TaskKind::Teach => "Command to learn",
            TaskKind::Examples => "Command to show examples for",
            TaskKind::Improve => "Command to improve",
            TaskKind::Convert => "Command to convert",
            TaskKind::Fix => "Command to fix",
            TaskKind::DiagnoseError => "Error message to diagnose",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_generate_expects_list() {
        let list_kinds: Vec<_> = TaskKind::ALL
            .iter()
            .filter(|k| k.expects_command_list())
            .collect();
        assert_eq!(list_kinds, vec![&TaskKind::Generate]);
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = TaskKind::ALL.iter().map(|k| k.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), TaskKind::ALL.len());
    }
}
