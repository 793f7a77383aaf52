//! Error types shared across itinera.
//!
//! Collaborator failures (chat completion, web search) are never retried or
//! swallowed: each flow wraps them in its own error and hands them back to the
//! caller unchanged.
//!
//! ```
//! use itinera::error::{LlmError, PlannerError};
//!
//! let err = PlannerError::InvalidRounds(0);
//! assert_eq!(err.to_string(), "max_rounds must be at least 1 (got 0)");
//!
//! let err: PlannerError = LlmError::EmptyResponse.into();
//! assert!(err.to_string().contains("no choices"));
//! ```

use thiserror::Error;

use crate::itinera::agent::AgentRole;

/// Failure of a text-generation backend call.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The provider rejected or failed the request (network, auth, rate limit...).
    #[error("chat completion request failed: {0}")]
    Api(String),

    /// The provider answered but the response carried no choices.
    #[error("chat completion returned no choices")]
    EmptyResponse,
}

/// Failure of a web-search backend call.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("search API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("could not decode search response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors surfaced by [`TravelPlanner`](crate::planner::TravelPlanner).
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("max_rounds must be at least 1 (got {0})")]
    InvalidRounds(usize),

    #[error("{found} agent placed in the {expected} slot")]
    RoleMismatch { expected: AgentRole, found: AgentRole },

    #[error(transparent)]
    Agent(#[from] LlmError),
}

/// Errors surfaced by [`SearchResponder`](crate::responder::SearchResponder).
#[derive(Debug, Error)]
pub enum ResponderError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Errors raised while assembling an [`ItineraConfig`](crate::ItineraConfig).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("environment variable {name} has an invalid value: {value}")]
    InvalidValue { name: &'static str, value: String },
}
