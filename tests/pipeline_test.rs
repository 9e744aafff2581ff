use askshell::ai::transport::MockTransport;
use askshell::ai::{ErrorKind, Gateway, ProviderConfig, ProviderId, TaskKind};
use askshell::commands::answer;
use serde_json::{json, Value};
use std::sync::Arc;

const EXPLAIN_REPLY: &str = "tar ||| archive tool\n---\n-xzf ||| extract a gzipped archive";

/// provider별 응답 본문 형식
fn wire_reply(id: ProviderId, text: &str) -> Value {
    match id {
        ProviderId::Server => json!({ "response": text }),
        ProviderId::Ollama => json!({ "message": { "role": "assistant", "content": text } }),
        ProviderId::Anthropic => json!({ "content": [{ "type": "text", "text": text }] }),
        ProviderId::Gemini => json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        }),
        ProviderId::Cohere => json!({
            "message": { "role": "assistant", "content": [{ "type": "text", "text": text }] }
        }),
        ProviderId::OpenAi
        | ProviderId::Groq
        | ProviderId::Mistral
        | ProviderId::DeepSeek
        | ProviderId::OpenRouter => json!({
            "choices": [{ "message": { "role": "assistant", "content": text } }]
        }),
    }
}

/// provider가 사전 검사를 통과하는 최소 설정
fn ready_config(id: ProviderId) -> ProviderConfig {
    let config = ProviderConfig::for_provider(id.as_str());
    match id {
        ProviderId::Server => config
            .with_base_url("https://assist.example.com")
            .with_auth_token("jwt-abc"),
        ProviderId::Ollama => config.with_model("llama3"),
        _ => config.with_api_key("key-123"),
    }
}

#[tokio::test]
async fn test_every_provider_renders_same_output() {
    for id in ProviderId::ALL {
        let transport = Arc::new(MockTransport::replying(
            200,
            wire_reply(id, EXPLAIN_REPLY).to_string(),
        ));
        let gateway = Gateway::new(transport.clone());

        let rendered = answer(&gateway, TaskKind::Explain, "tar -xzf a.tgz", &ready_config(id))
            .await
            .unwrap_or_else(|f| panic!("{id}: {f}"));

        assert_eq!(
            rendered.plain,
            "tar: archive tool\n-xzf: extract a gzipped archive",
            "{id}"
        );
        assert_eq!(transport.call_count(), 1, "{id}");
    }
}

#[tokio::test]
async fn test_every_provider_requires_its_settings() {
    for id in ProviderId::ALL {
        let transport = Arc::new(MockTransport::new());
        let gateway = Gateway::new(transport.clone());
        let bare = ProviderConfig::for_provider(id.as_str());

        let failure = answer(&gateway, TaskKind::Explain, "ls", &bare)
            .await
            .unwrap_err();

        let expected = match id {
            ProviderId::Ollama => ErrorKind::MissingModel,
            _ => ErrorKind::MissingCredential,
        };
        assert_eq!(failure.kind, expected, "{id}");
        assert_eq!(failure.provider, id);
        assert_eq!(transport.call_count(), 0, "{id}");
    }
}

#[tokio::test]
async fn test_generate_uses_command_list() {
    let id = ProviderId::Anthropic;
    let transport = Arc::new(MockTransport::replying(
        200,
        wire_reply(id, "find . -size +100M, du -ah . | sort -rh | head").to_string(),
    ));
    let gateway = Gateway::new(transport.clone());

    let rendered = answer(&gateway, TaskKind::Generate, "big files", &ready_config(id))
        .await
        .unwrap();
    assert_eq!(rendered.plain, "find . -size +100M\ndu -ah . | sort -rh | head");

    let sent = transport.last_request().unwrap();
    assert_eq!(sent.url, "https://api.anthropic.com/v1/messages");
    assert_eq!(sent.body["model"], "claude-3-5-haiku-latest");
}

#[tokio::test]
async fn test_rate_limit_is_reported_with_origin() {
    let transport = Arc::new(MockTransport::replying(
        429,
        r#"{"error":{"message":"Rate limit reached for requests"}}"#,
    ));
    let gateway = Gateway::new(transport);
    let config = ready_config(ProviderId::Groq).with_model("llama-3.3-70b-versatile");

    let failure = answer(&gateway, TaskKind::Teach, "awk", &config)
        .await
        .unwrap_err();
    assert_eq!(failure.kind, ErrorKind::RateLimited);
    assert_eq!(
        failure.to_string(),
        "[groq/llama-3.3-70b-versatile] RateLimited: HTTP 429: Rate limit reached for requests"
    );
}

#[tokio::test]
async fn test_empty_reply_is_not_rendered() {
    let transport = Arc::new(MockTransport::replying(
        200,
        wire_reply(ProviderId::OpenAi, "   ").to_string(),
    ));
    let gateway = Gateway::new(transport);

    let failure = answer(&gateway, TaskKind::Explain, "ls", &ready_config(ProviderId::OpenAi))
        .await
        .unwrap_err();
    assert_eq!(failure.kind, ErrorKind::EmptyReply);
}
