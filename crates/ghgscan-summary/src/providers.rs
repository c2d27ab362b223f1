//! Hosted-model chat completion calls.
//!
//! Together, OpenAI and Groq share the OpenAI chat-completions format.
//! Anthropic uses its Messages API. All calls are non-streaming.

use ghgscan_core::{Error, Result};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::types::{ChatMessage, LLMProvider};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Send one completion request and return the generated text.
pub async fn complete(
    client: &Client,
    provider: LLMProvider,
    model: &str,
    api_key: &str,
    messages: &[ChatMessage],
    max_tokens: usize,
) -> Result<String> {
    debug!("Requesting completion from {} with model {}", provider, model);

    let request = client
        .post(provider.endpoint())
        .header("Content-Type", "application/json");

    let request = if provider.is_openai_compatible() {
        request
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&openai_body(model, messages, max_tokens))
    } else {
        request
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&anthropic_body(model, messages, max_tokens))
    };

    let response = request
        .send()
        .await
        .map_err(|e| Error::Http(format!("Request to {} failed: {}", provider, e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Summary(format!("{} API error {}: {}", provider, status, body)));
    }

    let parsed: Value = response
        .json()
        .await
        .map_err(|e| Error::Summary(format!("{} returned unreadable body: {}", provider, e)))?;

    let content = if provider.is_openai_compatible() {
        openai_content(&parsed)
    } else {
        anthropic_content(&parsed)
    };

    content.ok_or_else(|| Error::Summary(format!("{} response had no message content", provider)))
}

fn openai_body(model: &str, messages: &[ChatMessage], max_tokens: usize) -> Value {
    let msgs: Vec<Value> = messages
        .iter()
        .map(|m| json!({"role": m.role, "content": m.content}))
        .collect();
    json!({
        "model": model,
        "messages": msgs,
        "max_tokens": max_tokens,
    })
}

fn anthropic_body(model: &str, messages: &[ChatMessage], max_tokens: usize) -> Value {
    // Separate system message from conversation
    let system_msg = messages.iter().find(|m| m.role == "system").map(|m| m.content.clone());
    let conv_msgs: Vec<Value> = messages
        .iter()
        .filter(|m| m.role != "system")
        .map(|m| json!({"role": m.role, "content": m.content}))
        .collect();

    let mut body = json!({
        "model": model,
        "messages": conv_msgs,
        "max_tokens": max_tokens,
    });
    if let Some(sys) = system_msg {
        body["system"] = json!(sys);
    }
    body
}

fn openai_content(parsed: &Value) -> Option<String> {
    parsed["choices"][0]["message"]["content"].as_str().map(str::to_string)
}

fn anthropic_content(parsed: &Value) -> Option<String> {
    let blocks = parsed["content"].as_array()?;
    let text: String = blocks
        .iter()
        .filter(|b| b["type"] == "text")
        .filter_map(|b| b["text"].as_str())
        .collect();
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_body() {
        let body = openai_body("gpt-4o-mini", &[ChatMessage::user("hello")], 300);
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 300);
        assert_eq!(body["messages"][0]["role"], "user");
        assert!(body.get("stream").is_none());
    }

    #[test]
    fn test_anthropic_body_lifts_system() {
        let messages = vec![
            ChatMessage {
                role: "system".into(),
                content: "be brief".into(),
            },
            ChatMessage::user("hello"),
        ];
        let body = anthropic_body("claude-3-5-haiku-20241022", &messages, 300);
        assert_eq!(body["system"], "be brief");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_openai_content() {
        let parsed = json!({"choices": [{"message": {"role": "assistant", "content": "1. Insight"}}]});
        assert_eq!(openai_content(&parsed).as_deref(), Some("1. Insight"));
        assert_eq!(openai_content(&json!({"choices": []})), None);
    }

    #[test]
    fn test_anthropic_content() {
        let parsed = json!({"content": [
            {"type": "text", "text": "First. "},
            {"type": "tool_use", "id": "x"},
            {"type": "text", "text": "Second."}
        ]});
        assert_eq!(anthropic_content(&parsed).as_deref(), Some("First. Second."));
        assert_eq!(anthropic_content(&json!({"content": []})), None);
        assert_eq!(anthropic_content(&json!({"error": "bad"})), None);
    }
}
