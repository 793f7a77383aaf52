//! HTTP backend for the itinerary web front end.
//!
//! Two JSON routes, both answering `200 OK` with an [`Envelope`]:
//!
//! | Route                 | Body                                              |
//! |-----------------------|---------------------------------------------------|
//! | `POST /api/itinerary` | `{ "travel_request": "..." }`                     |
//! | `POST /api/chat`      | `{ "question": "...", "itinerary_context": "..." }` |
//!
//! Every request gets a fresh [`TravelPlanner`] or [`SearchResponder`], so agent memory never
//! leaks between callers. The `stdout` field of the envelope carries the status lines of the
//! run, collected from the planner/responder events.
//!
//! Only available with the `http-server` feature.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::itinera::config::ItineraConfig;
use crate::itinera::event::{EventHandler, PlannerEvent, ResponderEvent};
use crate::itinera::planner::{StopReason, TravelPlanner};
use crate::itinera::responder::SearchResponder;

type PlannerFactory = dyn Fn() -> TravelPlanner + Send + Sync;
type ResponderFactory = dyn Fn() -> SearchResponder + Send + Sync;

/// Shared router state: how to build a planner or responder for one request.
#[derive(Clone)]
pub struct AppState {
    planner: Arc<PlannerFactory>,
    responder: Arc<ResponderFactory>,
    max_rounds: usize,
}

impl AppState {
    pub fn new<P, R>(planner: P, responder: R, max_rounds: usize) -> Self
    where
        P: Fn() -> TravelPlanner + Send + Sync + 'static,
        R: Fn() -> SearchResponder + Send + Sync + 'static,
    {
        Self {
            planner: Arc::new(planner),
            responder: Arc::new(responder),
            max_rounds,
        }
    }

    pub fn from_config(config: ItineraConfig) -> Self {
        let config = Arc::new(config);
        let max_rounds = config.max_rounds;
        let planner_config = config.clone();
        Self::new(
            move || TravelPlanner::from_config(&planner_config),
            move || SearchResponder::from_config(&config),
            max_rounds,
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct ItineraryRequest {
    #[serde(default)]
    pub travel_request: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub itinerary_context: Option<String>,
}

/// Response body shared by both routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: String,
    pub response: String,
    pub stdout: String,
    pub stderr: String,
    pub error_code: i32,
}

impl Envelope {
    fn success(response: String, stdout: String) -> Self {
        Self {
            status: "success".to_string(),
            response,
            stdout,
            stderr: String::new(),
            error_code: 0,
        }
    }

    fn error(stderr: impl Into<String>, stdout: String) -> Self {
        Self {
            status: "error".to_string(),
            response: String::new(),
            stdout,
            stderr: stderr.into(),
            error_code: 1,
        }
    }
}

/// Renders events as the human-readable status lines returned in `stdout`.
#[derive(Default)]
struct StatusLog {
    lines: Mutex<Vec<String>>,
}

impl StatusLog {
    fn push(&self, line: String) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line);
        }
    }

    fn render(&self) -> String {
        self.lines
            .lock()
            .map(|lines| lines.iter().map(|l| format!("{}\n", l)).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EventHandler for StatusLog {
    async fn on_planner_event(&self, event: &PlannerEvent) {
        let line = match event {
            PlannerEvent::SessionStarted { max_rounds, .. } => {
                format!("Starting travel planning (up to {} rounds)", max_rounds)
            }
            PlannerEvent::RoundStarted { round, .. } => format!("--- Round {} ---", round),
            PlannerEvent::AgentResponded {
                role,
                response_length,
                ..
            } => format!("{} responded ({} chars)", role, response_length),
            PlannerEvent::SentinelDetected { .. } => {
                "Critic approved the plan, moving to detailed itinerary".to_string()
            }
            PlannerEvent::AgentTerminated { role, .. } => format!("{} ended the discussion", role),
            PlannerEvent::PhaseOneCompleted {
                rounds,
                stop_reason,
                ..
            } => match stop_reason {
                StopReason::MaxRounds => format!("Reached the limit of {} rounds", rounds),
                StopReason::Sentinel => format!("Planning converged after {} rounds", rounds),
                StopReason::Terminated(role) => {
                    format!("Planning stopped by {} after {} rounds", role, rounds)
                }
            },
            PlannerEvent::ItineraryRequested { .. } => "Creating detailed itinerary...".to_string(),
            PlannerEvent::SessionCompleted {
                produced_itinerary, ..
            } => {
                if *produced_itinerary {
                    "Itinerary ready".to_string()
                } else {
                    "No itinerary generated".to_string()
                }
            }
        };
        self.push(line);
    }

    async fn on_responder_event(&self, event: &ResponderEvent) {
        match event {
            ResponderEvent::QuestionReceived { question } => self.push(format!("User: {}", question)),
            ResponderEvent::SearchQueryRefined { query } => {
                self.push(format!("Searching for: {}", query))
            }
            ResponderEvent::SearchCompleted { result_count, .. } => {
                self.push(format!("Found {} results", result_count))
            }
            ResponderEvent::SearchDecided { .. } | ResponderEvent::AnswerGenerated { .. } => {}
        }
    }
}

/// Build the router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/itinerary", post(create_itinerary))
        .route("/api/chat", post(chat))
        .with_state(state)
}

/// Bind `addr` and serve until the process exits.
pub async fn serve(config: ItineraConfig, addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    log::info!("itinera backend listening on {}", listener.local_addr()?);
    axum::serve(listener, router(AppState::from_config(config))).await
}

async fn create_itinerary(
    State(state): State<AppState>,
    Json(request): Json<ItineraryRequest>,
) -> Json<Envelope> {
    let travel_request = request.travel_request.trim();
    if travel_request.is_empty() {
        return Json(Envelope::error("travel_request must not be empty", String::new()));
    }

    let status = Arc::new(StatusLog::default());
    let mut planner = (state.planner)().with_event_handler(status.clone());
    let envelope = match planner.run_session(travel_request, state.max_rounds).await {
        Ok(itinerary) => Envelope::success(itinerary.unwrap_or_default(), status.render()),
        Err(err) => {
            log::error!("POST /api/itinerary failed: {}", err);
            Envelope::error(err.to_string(), status.render())
        }
    };
    Json(envelope)
}

async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Json<Envelope> {
    let question = request.question.trim();
    if question.is_empty() {
        return Json(Envelope::error("question must not be empty", String::new()));
    }

    let status = Arc::new(StatusLog::default());
    let responder = (state.responder)().with_event_handler(status.clone());
    let envelope = match responder
        .respond_with_context(question, request.itinerary_context.as_deref())
        .await
    {
        Ok(answer) => Envelope::success(answer, status.render()),
        Err(err) => {
            log::error!("POST /api/chat failed: {}", err);
            Envelope::error(err.to_string(), status.render())
        }
    };
    Json(envelope)
}
