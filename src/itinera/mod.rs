// src/itinera/mod.rs

pub mod agent;
pub mod client_wrapper;
pub mod clients;
pub mod config;
pub mod error;
pub mod event;
pub mod llm_session;
pub mod planner;
pub mod prompts;
pub mod responder;
pub mod search;
#[cfg(feature = "http-server")]
pub mod server;

// Export LLMSession at itinera::LLMSession as well as itinera::llm_session::LLMSession
pub use llm_session::LLMSession;
