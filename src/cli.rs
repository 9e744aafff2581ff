use crate::ai::TaskKind;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "askshell")]
#[command(version)]
#[command(about = "AI shell assistant: generate, explain and fix shell commands", long_about = None)]
pub struct Cli {
    /// 이번 호출에만 사용할 AI provider (server, ollama, openai, anthropic, ...)
    #[arg(short = 'p', long, global = true)]
    pub provider: Option<String>,

    /// 이번 호출에만 사용할 모델
    #[arg(short = 'm', long, global = true)]
    pub model: Option<String>,

    /// 디버그 로그 출력 (stderr)
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// 클립보드에 복사하지 않음
    #[arg(long, global = true)]
    pub no_copy: bool,

    /// 색상/정렬 없이 일반 텍스트로 출력
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate shell commands from a description
    Generate(TextArgs),

    /// Explain what a command does, part by part
    Explain(TextArgs),

    /// Teach a command step by step
    Teach(TextArgs),

    /// Show usage examples for a command
    Examples(TextArgs),

    /// Suggest a better version of a command
    Improve(TextArgs),

    /// Convert a command to another shell or OS
    Convert(ConvertArgs),

    /// Fix a broken command
    Fix(TextArgs),

    /// Diagnose an error message
    #[command(alias = "diagnose")]
    Error(TextArgs),

    /// Manage ~/.askshell/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// List supported providers and their default models
    Providers,
}

#[derive(Args, Debug, Clone)]
pub struct TextArgs {
    /// 명령어 또는 설명 (없으면 대화형으로 입력)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub text: Vec<String>,
}

impl TextArgs {
    /// 공백으로 이어 붙인 입력 (비어 있으면 `None`)
    pub fn joined(&self) -> Option<String> {
        let text = self.text.join(" ");
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// 변환 대상 셸 또는 OS (예: powershell, fish, macos)
    #[arg(short = 't', long = "to")]
    pub to: Option<String>,

    #[command(flatten)]
    pub input: TextArgs,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Show every configured value (secrets masked)
    List,

    /// Print one value
    Get { key: String },

    /// Change one value (an empty value unsets optional keys)
    Set { key: String, value: String },

    /// Print the config file path
    Path,
}

impl Command {
    /// AI 작업 서브커맨드의 작업 종류
    pub fn task_kind(&self) -> Option<TaskKind> {
        match self {
            Command::Generate(_) => Some(TaskKind::Generate),
            Command::Explain(_) => Some(TaskKind::Explain),
            Command::Teach(_) => Some(TaskKind::Teach),
            Command::Examples(_) => Some(TaskKind::Examples),
            Command::Improve(_) => Some(TaskKind::Improve),
            Command::Convert(_) => Some(TaskKind::Convert),
            Command::Fix(_) => Some(TaskKind::Fix),
            Command::Error(_) => Some(TaskKind::DiagnoseError),
            Command::Config { .. } | Command::Providers => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_explain_with_hyphens() {
        let cli = Cli::parse_from(["askshell", "explain", "ls", "-la", "--color=auto"]);
        match &cli.command {
            Command::Explain(args) => assert_eq!(args.joined().as_deref(), Some("ls -la --color=auto")),
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.command.task_kind(), Some(TaskKind::Explain));
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::parse_from([
            "askshell", "-p", "ollama", "-m", "llama3", "--plain", "--no-copy", "generate", "list", "files",
        ]);
        assert_eq!(cli.provider.as_deref(), Some("ollama"));
        assert_eq!(cli.model.as_deref(), Some("llama3"));
        assert!(cli.plain);
        assert!(cli.no_copy);
        assert_eq!(cli.command.task_kind(), Some(TaskKind::Generate));
    }

    #[test]
    fn test_parse_convert_target() {
        let cli = Cli::parse_from(["askshell", "convert", "--to", "powershell", "rm", "-rf", "build"]);
        match cli.command {
            Command::Convert(args) => {
                assert_eq!(args.to.as_deref(), Some("powershell"));
                assert_eq!(args.input.joined().as_deref(), Some("rm -rf build"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_error_alias() {
        let cli = Cli::parse_from(["askshell", "diagnose", "permission", "denied"]);
        assert_eq!(cli.command.task_kind(), Some(TaskKind::DiagnoseError));
    }

    #[test]
    fn test_empty_text_is_none() {
        let cli = Cli::parse_from(["askshell", "fix"]);
        match cli.command {
            Command::Fix(args) => assert_eq!(args.joined(), None),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::parse_from(["askshell", "config", "set", "apiKey", "sk-test"]);
        match cli.command {
            Command::Config {
                command: ConfigCommand::Set { key, value },
            } => {
                assert_eq!(key, "apiKey");
                assert_eq!(value, "sk-test");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
