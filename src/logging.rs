use std::io::IsTerminal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// 로그 필터를 지정하는 환경 변수 (예: `ASKSHELL_LOG=askshell=trace`)
pub const LOG_ENV: &str = "ASKSHELL_LOG";

/// 필터 우선순위: `ASKSHELL_LOG` → `--debug` → `warn`
pub fn filter_directive(env_value: Option<&str>, debug: bool) -> String {
    match env_value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(directive) => directive.to_string(),
        None if debug => "askshell=debug".to_string(),
        None => "warn".to_string(),
    }
}

/// 로깅 초기화 (stdout은 결과 전용이므로 stderr에 기록)
///
/// 이미 초기화되어 있으면 아무것도 하지 않습니다.
pub fn init(debug: bool) {
    let env_value = std::env::var(LOG_ENV).ok();
    let directive = filter_directive(env_value.as_deref(), debug);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = Registry::default()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(std::io::stderr().is_terminal())
                .with_writer(std::io::stderr),
        )
        .try_init();
}
