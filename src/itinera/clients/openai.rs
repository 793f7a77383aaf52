//! The `OpenAIClient` struct implements `ClientWrapper` for OpenAI’s Chat API,
//! capturing both the assistant response and the token usage of the last call.
//!
//! # Example
//!
//! ```rust,no_run
//! use itinera::clients::openai::{OpenAIClient, Model};
//! use itinera::client_wrapper::{ClientWrapper, Message};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let secret_key = std::env::var("OPENAI_API_KEY")?;
//!     let client = OpenAIClient::new_with_model_enum(&secret_key, Model::GPT4o);
//!
//!     let resp = client
//!         .send_message(
//!             &[Message::system("You are terse."), Message::user("Hello!")],
//!             Some(50),
//!         )
//!         .await?;
//!     println!("Assistant: {}", resp.content);
//!
//!     if let Some(usage) = client.get_last_usage().await {
//!         println!("Tokens total: {}", usage.total_tokens);
//!     }
//!     Ok(())
//! }
//! ```
use async_trait::async_trait;
use openai_rust2 as openai_rust;
use tokio::sync::Mutex;

use crate::itinera::client_wrapper::{ClientWrapper, Message, Role, TokenUsage};
use crate::itinera::clients::common::{get_shared_http_client, send_and_track, to_chat_messages};
use crate::itinera::error::LlmError;

/// Model identifiers the planner and responder are tuned for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Model {
    /// `gpt-4o` – Omni model, default for the guide, organizer and responder.
    GPT4o,
    /// `gpt-4o-mini` – cost effective GPT-4o derivative, default for traveller and critic.
    GPT4oMini,
    /// `gpt-4.1` – general availability GPT-4.1.
    GPT41,
    /// `gpt-4.1-mini` – reduced cost GPT-4.1 tier.
    GPT41Mini,
    /// `gpt-4.1-nano` – ultra low cost GPT-4.1 derivative.
    GPT41Nano,
}

/// Convert a [`Model`] variant into the string identifier expected by the REST API.
pub fn model_to_string(model: Model) -> String {
    match model {
        Model::GPT4o => "gpt-4o".to_string(),
        Model::GPT4oMini => "gpt-4o-mini".to_string(),
        Model::GPT41 => "gpt-4.1".to_string(),
        Model::GPT41Mini => "gpt-4.1-mini".to_string(),
        Model::GPT41Nano => "gpt-4.1-nano".to_string(),
    }
}

/// Client wrapper for OpenAI's Chat Completions API.
///
/// Holds the selected model plus a [`TokenUsage`] slot for the last request. It reuses the
/// pooled HTTP client from [`crate::itinera::clients::common`].
pub struct OpenAIClient {
    client: openai_rust::Client,
    model: String,
    token_usage: Mutex<Option<TokenUsage>>,
}

impl OpenAIClient {
    /// Construct a new client using the provided API key and [`Model`] variant.
    pub fn new_with_model_enum(secret_key: &str, model: Model) -> Self {
        Self::new_with_model_string(secret_key, &model_to_string(model))
    }

    /// Construct a new client using the provided API key and explicit model name.
    pub fn new_with_model_string(secret_key: &str, model_name: &str) -> Self {
        OpenAIClient {
            client: openai_rust::Client::new_with_client(
                secret_key,
                get_shared_http_client().clone(),
            ),
            model: model_name.to_string(),
            token_usage: Mutex::new(None),
        }
    }

    /// Construct a client targeting a custom OpenAI compatible base URL.
    pub fn new_with_base_url(secret_key: &str, model_name: &str, base_url: &str) -> Self {
        OpenAIClient {
            client: openai_rust::Client::new_with_client_and_base_url(
                secret_key,
                get_shared_http_client().clone(),
                base_url,
            ),
            model: model_name.to_string(),
            token_usage: Mutex::new(None),
        }
    }
}

#[async_trait]
impl ClientWrapper for OpenAIClient {
    async fn send_message(
        &self,
        messages: &[Message],
        max_output_tokens: Option<usize>,
    ) -> Result<Message, LlmError> {
        let content = send_and_track(
            &self.client,
            &self.model,
            to_chat_messages(messages),
            Some("/v1/chat/completions".to_string()),
            &self.token_usage,
            max_output_tokens,
        )
        .await
        .map_err(|err| {
            log::error!(
                "OpenAIClient::send_message(...): model {} failed: {}",
                self.model,
                err
            );
            err
        })?;

        Ok(Message::new(Role::Assistant, content))
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn usage_slot(&self) -> Option<&Mutex<Option<TokenUsage>>> {
        Some(&self.token_usage)
    }
}
