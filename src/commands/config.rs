use crate::ai::{AiProvider, ModelPolicy, ProviderFactory, ProviderId};
use crate::cli::ConfigCommand;
use crate::config::{Config, ConfigKey};
use crate::error::{AskShellError, Result};
use colored::*;

/// `config` 서브커맨드 실행
pub fn run_config(command: &ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::List => {
            let config = Config::load()?;
            for (key, value) in config.get_all() {
                println!("{} = {}", key.cyan(), value);
            }
        }
        ConfigCommand::Get { key } => {
            let config = Config::load()?;
            match config.get(key)? {
                Some(value) => println!("{}", value),
                None => {
                    return Err(AskShellError::ConfigError(format!("'{}' is not set", key)));
                }
            }
        }
        ConfigCommand::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(key, value)?;
            config.save()?;

            let key = ConfigKey::parse(key)?;
            if key == ConfigKey::Provider && !ProviderFactory::is_supported(&config.provider) {
                eprintln!(
                    "{}",
                    format!(
                        "⚠ '{}' is not a known provider; requests will go to the managed service",
                        config.provider
                    )
                    .yellow()
                );
            }
            eprintln!("{} {} updated", "✓".green(), key.as_str());
        }
        ConfigCommand::Path => {
            println!("{}", Config::config_path().display());
        }
    }
    Ok(())
}

/// provider 목록 한 줄 (`id  default model`)
pub fn describe_provider(provider: &dyn AiProvider) -> (ProviderId, String) {
    let model = match provider.model_policy() {
        ModelPolicy::Default(model) => model.to_string(),
        ModelPolicy::Required => "(model required)".to_string(),
        ModelPolicy::Optional => "(chosen by server)".to_string(),
    };
    (provider.id(), model)
}

/// `providers` 서브커맨드: 지원 provider와 기본 모델 출력
pub fn list_providers() -> Result<()> {
    let config = Config::load()?;
    let active = ProviderId::resolve(Some(config.provider.as_str()));

    let rows: Vec<(ProviderId, String)> = ProviderId::ALL
        .into_iter()
        .map(|id| describe_provider(ProviderFactory::create(id).as_ref()))
        .collect();
    let width = rows.iter().map(|(id, _)| id.as_str().len()).max().unwrap_or(0) + 2;

    for (id, model) in rows {
        let marker = if id == active { "*".green().bold() } else { " ".normal() };
        println!(
            "{} {}{}{}",
            marker,
            id.as_str().bold(),
            " ".repeat(width - id.as_str().len()),
            model.dimmed()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_provider() {
        let (id, model) = describe_provider(ProviderFactory::create(ProviderId::Anthropic).as_ref());
        assert_eq!(id, ProviderId::Anthropic);
        assert_eq!(model, "claude-3-5-haiku-latest");

        let (_, model) = describe_provider(ProviderFactory::create(ProviderId::Ollama).as_ref());
        assert_eq!(model, "(model required)");

        let (_, model) = describe_provider(ProviderFactory::create(ProviderId::Server).as_ref());
        assert_eq!(model, "(chosen by server)");
    }
}
