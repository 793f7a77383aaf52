use crate::itinera::client_wrapper::{Message, TokenUsage};
use crate::itinera::error::LlmError;
use openai_rust::chat;
use openai_rust2 as openai_rust;
use std::time::Duration;
use tokio::sync::Mutex;

lazy_static::lazy_static! {
    /// One pooled HTTP client shared by every chat and search wrapper, so
    /// connections and TLS sessions are reused across agents.
    static ref SHARED_HTTP_CLIENT: reqwest::Client = build_http_client();
}

fn build_http_client() -> reqwest::Client {
    reqwest::ClientBuilder::new()
        // Keep idle connections alive for 90 seconds
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .pool_max_idle_per_host(10)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .connect_timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|err| {
            log::warn!(
                "itinera::clients::common: falling back to default HTTP client: {}",
                err
            );
            reqwest::Client::new()
        })
}

/// Borrow the process-wide pooled `reqwest::Client`.
pub fn get_shared_http_client() -> &'static reqwest::Client {
    &SHARED_HTTP_CLIENT
}

/// Convert our messages into the format expected by openai_rust.
pub fn to_chat_messages(messages: &[Message]) -> Vec<chat::Message> {
    messages
        .iter()
        .map(|msg| chat::Message {
            role: msg.role.as_str().to_owned(),
            content: msg.content.to_string(),
        })
        .collect()
}

/// Clamp a completion cap to the API's `u32` field.
pub(crate) fn output_token_cap(limit: usize) -> u32 {
    u32::try_from(limit).unwrap_or(u32::MAX)
}

/// Send a chat request, record its usage, and return the assistant’s content.
pub async fn send_and_track(
    api: &openai_rust::Client,
    model: &str,
    formatted_msgs: Vec<chat::Message>,
    url_path: Option<String>,
    usage_slot: &Mutex<Option<TokenUsage>>,
    max_output_tokens: Option<usize>,
) -> Result<String, LlmError> {
    let mut chat_arguments = chat::ChatArguments::new(model, formatted_msgs);
    if let Some(limit) = max_output_tokens {
        chat_arguments.max_tokens = Some(output_token_cap(limit));
    }

    let response = api.create_chat(chat_arguments, url_path).await.map_err(|err| {
        log::error!(
            "itinera::clients::common::send_and_track(...): OpenAI API Error: {}",
            err
        );
        LlmError::Api(err.to_string())
    })?;

    let usage = TokenUsage {
        input_tokens: response.usage.prompt_tokens as usize,
        output_tokens: response.usage.completion_tokens as usize,
        total_tokens: response.usage.total_tokens as usize,
    };
    // Store it for get_last_usage()
    *usage_slot.lock().await = Some(usage);

    response
        .choices
        .first()
        .map(|choice| choice.message.content.clone())
        .ok_or(LlmError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_token_cap_saturates() {
        assert_eq!(output_token_cap(10), 10);
        assert_eq!(output_token_cap(u32::MAX as usize), u32::MAX);
        #[cfg(target_pointer_width = "64")]
        assert_eq!(output_token_cap(u32::MAX as usize + 1), u32::MAX);
    }

    #[test]
    fn test_chat_messages_keep_role_names() {
        let converted = to_chat_messages(&[Message::system("be brief"), Message::user("hi")]);
        assert_eq!(converted[0].role, "system");
        assert_eq!(converted[1].content, "hi");
    }
}
