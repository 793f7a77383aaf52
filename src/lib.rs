//! # itinera
//!
//! itinera orchestrates two small LLM workflows for trip planning:
//!
//! * **Multi-agent planning**: [`TravelPlanner`] runs a travel guide, a traveller and a critic
//!   through bounded discussion rounds, then asks an itinerary organizer to turn the whole
//!   discussion into a day-by-day plan.
//! * **Search-augmented answers**: [`SearchResponder`] decides per question whether live web
//!   results are needed, searches when they are, and answers grounded on what it found.
//!
//! Both flows are strictly sequential: every call consumes the previous call's output. Backend
//! failures are returned to the caller as typed errors ([`error`]); nothing is retried.
//!
//! ## Planning a trip
//!
//! ```rust,no_run
//! use itinera::{ItineraConfig, TravelPlanner};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     itinera::init_logger();
//!
//!     let config = ItineraConfig::from_env()?;
//!     let mut planner = TravelPlanner::from_config(&config);
//!
//!     match planner.run_session("I want to plan a 3-day trip to Kyoto", 2).await? {
//!         Some(itinerary) => println!("{}", itinerary),
//!         None => println!("No itinerary generated"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Answering a question
//!
//! ```rust,no_run
//! use itinera::{ItineraConfig, SearchResponder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let responder = SearchResponder::from_config(&ItineraConfig::from_env()?);
//!     println!("{}", responder.respond("When did the Berlin Wall fall?").await?);
//!     Ok(())
//! }
//! ```
//!
//! ## Bring your own backend
//!
//! Every agent talks to its model through the [`ClientWrapper`] trait and the responder
//! searches through [`search::SearchClient`], so both can be swapped for other providers or
//! scripted fakes:
//!
//! ```rust
//! use async_trait::async_trait;
//! use itinera::client_wrapper::{ClientWrapper, Message};
//! use itinera::error::LlmError;
//!
//! struct Canned;
//!
//! #[async_trait]
//! impl ClientWrapper for Canned {
//!     async fn send_message(
//!         &self,
//!         _messages: &[Message],
//!         _max_output_tokens: Option<usize>,
//!     ) -> Result<Message, LlmError> {
//!         Ok(Message::assistant("Visit Arashiyama at dawn."))
//!     }
//!
//!     fn model_name(&self) -> &str {
//!         "canned"
//!     }
//! }
//! ```
//!
//! The HTTP backend in `server` is available on the `http-server` feature.

use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialise the global [`env_logger`] subscriber exactly once.
///
/// ```rust
/// itinera::init_logger();
/// log::info!("Logger is ready");
/// ```
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        env_logger::init();
    });
}

// Import the top-level `itinera` module.
pub mod itinera;

// Re-exporting key items for easier external access.
pub use itinera::agent;
pub use itinera::agent::{Agent, AgentRole};
pub use itinera::client_wrapper;
pub use itinera::client_wrapper::{ClientWrapper, Message, Role};
pub use itinera::clients;
pub use itinera::config;
pub use itinera::config::{ItineraConfig, RoleModels};
pub use itinera::error;
pub use itinera::event;
pub use itinera::event::{EventHandler, PlannerEvent, ResponderEvent};
pub use itinera::llm_session::LLMSession;
pub use itinera::planner;
pub use itinera::planner::{StopReason, Transcript, TravelPlanner};
pub use itinera::prompts;
pub use itinera::responder;
pub use itinera::responder::SearchResponder;
pub use itinera::search;
#[cfg(feature = "http-server")]
pub use itinera::server;
