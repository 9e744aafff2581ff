use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// 스피너 스타일 (provider 응답 대기 중)
///
/// 기본 draw target은 stderr이므로 stdout 결과와 섞이지 않습니다.
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// 스피너 메시지 (`Asking openai (gpt-4o-mini)...`)
pub fn waiting_message(provider: &str, model: Option<&str>) -> String {
    match model {
        Some(model) => format!("Asking {} ({})...", provider.bold(), model),
        None => format!("Asking {}...", provider.bold()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_spinner() {
        let spinner = create_spinner("테스트 중...");
        assert!(!spinner.is_finished());
        spinner.finish_and_clear();
        assert!(spinner.is_finished());
    }

    #[test]
    fn test_waiting_message() {
        colored::control::set_override(false);
        assert_eq!(waiting_message("openai", Some("gpt-4o-mini")), "Asking openai (gpt-4o-mini)...");
        assert_eq!(waiting_message("server", None), "Asking server...");
        colored::control::unset_override();
    }
}
