//! Role agents
//!
//! This module provides the [`Agent`] struct: a configured persona (role identity plus an
//! immutable system instruction) bound to a text-generation backend. The four roles of a
//! planning session (guide, traveller, critic, organizer) are all the same type and differ
//! only in configuration.
//!
//! Each agent owns an [`LLMSession`] holding its private memory of the exchange. When that
//! memory would no longer fit the agent's token budget, [`Agent::step`] reports termination
//! instead of calling the backend.
//!
//! # Example
//!
//! ```rust,no_run
//! use itinera::agent::{Agent, AgentRole};
//! use itinera::clients::openai::{Model, OpenAIClient};
//! use std::sync::Arc;
//!
//! # async {
//! let mut guide = Agent::new(
//!     AgentRole::Guide,
//!     Arc::new(OpenAIClient::new_with_model_enum("key", Model::GPT4o)),
//! );
//! let reply = guide.step("Plan a 3-day trip to Kyoto").await?;
//! println!("{} said: {}", guide.name(), reply.content);
//! # Ok::<(), itinera::error::LlmError>(())
//! # };
//! ```

use std::fmt;
use std::sync::Arc;

use crate::itinera::client_wrapper::{ClientWrapper, Message, Role, TokenUsage};
use crate::itinera::error::LlmError;
use crate::itinera::llm_session::LLMSession;
use crate::itinera::prompts;

/// Default context budget for role agents.
pub const DEFAULT_TOKEN_BUDGET: usize = 128_000;

/// Identity of a role agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentRole {
    Guide,
    Traveller,
    Critic,
    Organizer,
}

impl AgentRole {
    /// Speaker label used in transcripts and summaries.
    pub fn display_name(&self) -> &'static str {
        match self {
            AgentRole::Guide => "Travel Guide",
            AgentRole::Traveller => "Traveller",
            AgentRole::Critic => "Critic",
            AgentRole::Organizer => "Itinerary Organizer",
        }
    }

    /// The built-in system instruction for this role.
    pub fn default_instruction(&self) -> &'static str {
        match self {
            AgentRole::Guide => prompts::TRAVEL_GUIDE_PROMPT,
            AgentRole::Traveller => prompts::TRAVELLER_PROMPT,
            AgentRole::Critic => prompts::CRITIC_PROMPT,
            AgentRole::Organizer => prompts::ORGANIZER_PROMPT,
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Why an agent ended the exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminationReason {
    /// The agent's memory plus the new input no longer fits its token budget.
    ContextExhausted,
}

/// Result of one agent step.
#[derive(Debug, Clone)]
pub struct AgentResponse {
    /// Generated text. Empty when the agent terminated without calling its backend.
    pub content: String,
    /// Whether the agent itself chose to end the exchange.
    pub terminated: bool,
    pub reason: Option<TerminationReason>,
    /// Usage of the backend call behind this step, when the client reports it.
    pub tokens_used: Option<TokenUsage>,
}

/// A role agent: role identity, system instruction and backend handle.
pub struct Agent {
    role: AgentRole,
    instruction: Arc<str>,
    session: LLMSession,
}

impl Agent {
    /// Create an agent using the role's built-in instruction and the default token budget.
    pub fn new(role: AgentRole, client: Arc<dyn ClientWrapper>) -> Self {
        Self::with_instruction(role, role.default_instruction(), client)
    }

    /// Create an agent with a custom system instruction.
    pub fn with_instruction(
        role: AgentRole,
        instruction: impl Into<String>,
        client: Arc<dyn ClientWrapper>,
    ) -> Self {
        let instruction: String = instruction.into();
        Self {
            role,
            session: LLMSession::new(client, instruction.clone(), DEFAULT_TOKEN_BUDGET),
            instruction: Arc::from(instruction.as_str()),
        }
    }

    /// Override the token budget (builder pattern). Memory is reset.
    pub fn with_token_budget(mut self, budget: usize) -> Self {
        let client = self.session.client().clone();
        self.session = LLMSession::new(client, self.instruction.to_string(), budget);
        self
    }

    pub fn role(&self) -> AgentRole {
        self.role
    }

    pub fn name(&self) -> &'static str {
        self.role.display_name()
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn client(&self) -> &Arc<dyn ClientWrapper> {
        self.session.client()
    }

    pub fn memory(&self) -> &[Message] {
        self.session.history()
    }

    /// Feed `input` to the agent and return its reply.
    ///
    /// The input and reply are remembered for later steps. If the remembered exchange would
    /// reach the token budget the agent terminates without calling its backend.
    pub async fn step(&mut self, input: &str) -> Result<AgentResponse, LlmError> {
        if self.session.would_exceed_budget(input) {
            log::warn!(
                "Agent::step(...): {} terminated, context budget of {} tokens exhausted",
                self.name(),
                self.session.get_max_tokens()
            );
            self.session.push_message(Role::User, input.to_string());
            return Ok(AgentResponse {
                content: String::new(),
                terminated: true,
                reason: Some(TerminationReason::ContextExhausted),
                tokens_used: None,
            });
        }

        log::debug!(
            "Agent::step(...): {} on {} ({} remembered turns)",
            self.name(),
            self.client().model_name(),
            self.session.history_len()
        );
        let reply = self
            .session
            .send_message(Role::User, input.to_string(), None)
            .await?;

        Ok(AgentResponse {
            content: reply.content.to_string(),
            terminated: false,
            reason: None,
            tokens_used: self.client().get_last_usage().await,
        })
    }
}
