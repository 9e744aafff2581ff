use crate::ai::context::ExecutionContext;
use crate::ai::prompt_template::PromptTemplate;
use crate::ai::response_processor::ResponseProcessor;
use crate::ai::{ErrorKind, Failure, Gateway, ProviderConfig, ProviderId, TaskKind};
use crate::cli::Command;
use crate::error::Result;
use crate::ui::progress::waiting_message;
use crate::ui::prompt::require_text;
use crate::ui::{create_spinner, InputPrompt, OutputSink, RenderedOutput, Renderer};
use tracing::debug;

/// 서브커맨드 인자에서 모은 작업 입력
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    pub kind: TaskKind,
    pub text: Option<String>,
    pub target: Option<String>,
}

impl TaskInput {
    pub fn from_command(command: &Command) -> Option<Self> {
        let kind = command.task_kind()?;
        let (text, target) = match command {
            Command::Convert(args) => (args.input.joined(), args.to.clone()),
            Command::Generate(args)
            | Command::Explain(args)
            | Command::Teach(args)
            | Command::Examples(args)
            | Command::Improve(args)
            | Command::Fix(args)
            | Command::Error(args) => (args.joined(), None),
            Command::Config { .. } | Command::Providers => return None,
        };
        Some(Self { kind, text, target })
    }
}

/// 작업 종류에 맞게 사용자 프롬프트 구성
///
/// `generate`와 `fix`는 실행 환경 정보를 함께 보내고, `convert`는 대상 셸/OS를 붙입니다.
pub fn compose_input(
    kind: TaskKind,
    text: &str,
    target: Option<&str>,
    context: &ExecutionContext,
) -> String {
    match kind {
        TaskKind::Generate | TaskKind::Fix => PromptTemplate::with_context(text, &context.describe()),
        TaskKind::Convert => PromptTemplate::convert_input(text, target.unwrap_or_default()),
        _ => text.to_string(),
    }
}

/// 게이트웨이 호출 → 응답 파싱 → 두 채널 렌더링
pub async fn answer(
    gateway: &Gateway,
    kind: TaskKind,
    input: &str,
    config: &ProviderConfig,
) -> std::result::Result<RenderedOutput, Failure> {
    let reply = gateway.dispatch(kind, input, config).await.into_result()?;

    let structured = ResponseProcessor::process(&reply.text, kind)
        .map_err(|e| reply.failure(ErrorKind::EmptyStructuredOutput, e.to_string()))?;

    Renderer::render(&structured, kind)
        .map_err(|e| reply.failure(ErrorKind::EmptyStructuredOutput, e.to_string()))
}

/// AI 작업 서브커맨드 실행
pub async fn run_task(
    task: TaskInput,
    provider_config: &ProviderConfig,
    sink: &OutputSink,
) -> Result<()> {
    // 1. 입력 수집 (명령줄에 없으면 대화형)
    let prompt = InputPrompt::new();
    let text = match task.text.as_deref() {
        Some(text) => require_text(text)?,
        None => prompt.collect(task.kind)?,
    };
    let target = match (task.kind, task.target.as_deref()) {
        (TaskKind::Convert, Some(target)) => Some(require_text(target)?),
        (TaskKind::Convert, None) => Some(prompt.collect_target()?),
        _ => None,
    };

    // 2. 프롬프트 구성
    let context = ExecutionContext::detect();
    let input = compose_input(task.kind, &text, target.as_deref(), &context);
    debug!(task = %task.kind, shell = %context.shell, "composed user prompt");

    // 3. provider 호출 (스피너는 stderr, 클라이언트 생성 후 시작)
    let gateway = Gateway::with_default_transport()?;
    let provider_id = ProviderId::resolve(provider_config.provider_id.as_deref());
    let spinner = create_spinner(&waiting_message(
        provider_id.as_str(),
        provider_config.model.as_deref(),
    ));
    let result = answer(&gateway, task.kind, &input, provider_config).await;
    spinner.finish_and_clear();

    // 4. 출력
    let rendered = result?;
    sink.emit(&rendered).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::transport::MockTransport;
    use crate::cli::{ConvertArgs, TextArgs};
    use serde_json::json;
    use std::sync::Arc;

    fn context() -> ExecutionContext {
        ExecutionContext {
            os: "linux".to_string(),
            shell: "zsh".to_string(),
            cwd: "/home/dev/app".to_string(),
        }
    }

    fn openai_reply(text: &str) -> String {
        json!({"choices": [{"message": {"role": "assistant", "content": text}}]}).to_string()
    }

    fn openai_config() -> ProviderConfig {
        ProviderConfig::for_provider("openai").with_api_key("sk-test")
    }

    #[test]
    fn test_task_input_from_command() {
        let command = Command::Convert(ConvertArgs {
            to: Some("fish".to_string()),
            input: TextArgs {
                text: vec!["export".to_string(), "A=1".to_string()],
            },
        });
        let task = TaskInput::from_command(&command).unwrap();
        assert_eq!(task.kind, TaskKind::Convert);
        assert_eq!(task.text.as_deref(), Some("export A=1"));
        assert_eq!(task.target.as_deref(), Some("fish"));

        assert_eq!(TaskInput::from_command(&Command::Providers), None);
    }

    #[test]
    fn test_compose_input() {
        let ctx = context();
        let generated = compose_input(TaskKind::Generate, "list big files", None, &ctx);
        assert!(generated.contains("Shell: zsh"));
        assert!(generated.contains("list big files"));

        let converted = compose_input(TaskKind::Convert, "rm -rf build", Some("powershell"), &ctx);
        assert_eq!(converted, "Command: rm -rf build\nTarget: powershell");

        assert_eq!(compose_input(TaskKind::Explain, "ls -la", None, &ctx), "ls -la");
    }

    #[tokio::test]
    async fn test_answer_renders_records() {
        let transport = Arc::new(MockTransport::replying(
            200,
            openai_reply("ls ||| lists files\n---\n-la ||| long format"),
        ));
        let gateway = Gateway::new(transport.clone());

        let rendered = answer(&gateway, TaskKind::Explain, "ls -la", &openai_config())
            .await
            .unwrap();
        assert_eq!(rendered.plain, "ls: lists files\n-la: long format");
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_answer_renders_generated_commands() {
        let transport = Arc::new(MockTransport::replying(200, openai_reply("du -sh *, ncdu")));
        let gateway = Gateway::new(transport);

        let rendered = answer(&gateway, TaskKind::Generate, "disk usage", &openai_config())
            .await
            .unwrap();
        assert_eq!(rendered.plain, "du -sh *\nncdu");
    }

    #[tokio::test]
    async fn test_answer_without_records_is_failure() {
        let transport = Arc::new(MockTransport::replying(
            200,
            openai_reply("Sure! ls lists files."),
        ));
        let gateway = Gateway::new(transport);

        let failure = answer(&gateway, TaskKind::Explain, "ls", &openai_config())
            .await
            .unwrap_err();
        assert_eq!(failure.kind, ErrorKind::EmptyStructuredOutput);
        assert_eq!(failure.provider, ProviderId::OpenAi);
        assert_eq!(failure.model.as_deref(), Some("gpt-4o-mini"));
    }

    #[tokio::test]
    async fn test_answer_passes_gateway_failure_through() {
        let transport = Arc::new(MockTransport::replying(401, r#"{"error":{"message":"bad key"}}"#));
        let gateway = Gateway::new(transport);

        let failure = answer(&gateway, TaskKind::Fix, "gti status", &openai_config())
            .await
            .unwrap_err();
        assert_eq!(failure.kind, ErrorKind::Unauthorized);
        assert!(failure.to_string().starts_with("[openai/gpt-4o-mini] Unauthorized:"));
    }
}
