pub mod ask;
pub mod config;

pub use ask::{answer, compose_input, run_task, TaskInput};
pub use config::{list_providers, run_config};

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::error::Result;
use crate::ui::OutputSink;

/// 파싱된 명령줄을 서브커맨드별로 실행
pub async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Config { command } => run_config(command),
        Command::Providers => list_providers(),
        command => {
            let Some(task) = TaskInput::from_command(command) else {
                return Ok(());
            };

            // 호출마다 설정을 새로 읽어 스냅샷으로 사용
            let config = Config::load()?;
            let provider_config =
                config.provider_config(cli.provider.as_deref(), cli.model.as_deref());
            let sink = OutputSink::new(cli.plain, config.copy_to_clipboard && !cli.no_copy);

            run_task(task, &provider_config, &sink).await
        }
    }
}
