//! Planner and responder event system.
//!
//! Provides a callback-based observability layer. Implement [`EventHandler`] to receive
//! real-time notifications about:
//!
//! - **Planning sessions**: session start/end, round boundaries, each agent reply, the
//!   sentinel, agent termination, and the hand-off to the organizer
//! - **Search-augmented answers**: the question, the search decision, the refined query, the
//!   result count and the final answer
//!
//! Both handler methods default to no-ops, so you only override what you care about.
//!
//! # Example
//!
//! ```rust,no_run
//! use itinera::event::{EventHandler, PlannerEvent, ResponderEvent};
//! use async_trait::async_trait;
//!
//! struct ConsoleHandler;
//!
//! #[async_trait]
//! impl EventHandler for ConsoleHandler {
//!     async fn on_planner_event(&self, event: &PlannerEvent) {
//!         if let PlannerEvent::AgentResponded { role, round, response_length, .. } = event {
//!             println!("round {}: {} replied ({} chars)", round, role, response_length);
//!         }
//!     }
//!
//!     async fn on_responder_event(&self, event: &ResponderEvent) {
//!         if let ResponderEvent::SearchQueryRefined { query } = event {
//!             println!("Searching for: {}", query);
//!         }
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::itinera::agent::AgentRole;
use crate::itinera::planner::StopReason;

/// Events emitted by a [`TravelPlanner`](crate::planner::TravelPlanner) session.
///
/// ```text
/// SessionStarted
///   └─ RoundStarted { round: 1 }
///       ├─ AgentResponded { role: Guide }
///       ├─ AgentResponded { role: Traveller }
///       └─ AgentResponded { role: Critic }
///   └─ (SentinelDetected | AgentTerminated)?
/// PhaseOneCompleted { stop_reason }
/// ItineraryRequested
/// SessionCompleted
/// ```
#[derive(Debug, Clone)]
pub enum PlannerEvent {
    SessionStarted {
        session_id: String,
        max_rounds: usize,
        request_preview: String,
    },
    /// 1-based round number.
    RoundStarted { session_id: String, round: usize },
    AgentResponded {
        session_id: String,
        round: usize,
        role: AgentRole,
        response_length: usize,
    },
    /// The critic's reply contained the ready marker.
    SentinelDetected { session_id: String, round: usize },
    /// An agent ended the exchange itself.
    AgentTerminated {
        session_id: String,
        round: usize,
        role: AgentRole,
    },
    PhaseOneCompleted {
        session_id: String,
        rounds: usize,
        transcript_len: usize,
        stop_reason: StopReason,
    },
    /// Fired right before the single organizer call.
    ItineraryRequested {
        session_id: String,
        summary_length: usize,
    },
    SessionCompleted {
        session_id: String,
        produced_itinerary: bool,
    },
}

/// Events emitted by a [`SearchResponder`](crate::responder::SearchResponder).
#[derive(Debug, Clone)]
pub enum ResponderEvent {
    QuestionReceived { question: String },
    SearchDecided { needs_search: bool },
    SearchQueryRefined { query: String },
    SearchCompleted { query: String, result_count: usize },
    AnswerGenerated { used_search: bool, answer_length: usize },
}

/// Receiver for planner and responder events.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Called for every [`PlannerEvent`]. Default: no-op.
    async fn on_planner_event(&self, _event: &PlannerEvent) {}

    /// Called for every [`ResponderEvent`]. Default: no-op.
    async fn on_responder_event(&self, _event: &ResponderEvent) {}
}
