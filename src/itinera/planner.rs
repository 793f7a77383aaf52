//! Multi-agent travel planning.
//!
//! [`TravelPlanner`] drives a fixed cast of four [`Agent`]s through a bounded two-phase
//! conversation:
//!
//! 1. **High-level planning**: rounds of guide → traveller → critic. The guide answers the
//!    current message, the traveller reacts to the guide, and the critic reviews the exchange.
//!    The critic's review becomes the next round's message. The phase ends when the round
//!    budget is spent, an agent terminates, or the critic says
//!    [`READY_FOR_DETAILED_ITINERARY`](crate::prompts::READY_SENTINEL).
//! 2. **Detailed itinerary**: the whole transcript is summarised and handed to the organizer
//!    in exactly one call.
//!
//! Every step consumes the previous step's output, so a session is strictly sequential.
//! Backend failures propagate immediately; nothing is retried.
//!
//! ```text
//! round 1:  request ─▶ Guide ─▶ Traveller ─▶ Critic ─┐
//! round 2:  critic review ─▶ Guide ─▶ ...            │  (sentinel / termination / max_rounds)
//!                                                    ▼
//!                          numbered summary ─▶ Organizer ─▶ itinerary
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use itinera::planner::TravelPlanner;
//! use itinera::ItineraConfig;
//!
//! # async {
//! let config = ItineraConfig::new("sk-...", "tvly-...");
//! let mut planner = TravelPlanner::from_config(&config);
//!
//! match planner.run_session("Plan a 3-day trip to Kyoto", 2).await? {
//!     Some(itinerary) => println!("{}", itinerary),
//!     None => println!("No itinerary generated"),
//! }
//! # Ok::<(), itinera::error::PlannerError>(())
//! # };
//! ```

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::itinera::agent::{Agent, AgentResponse, AgentRole};
use crate::itinera::client_wrapper::ClientWrapper;
use crate::itinera::clients::openai::OpenAIClient;
use crate::itinera::config::ItineraConfig;
use crate::itinera::error::PlannerError;
use crate::itinera::event::{EventHandler, PlannerEvent};
use crate::itinera::prompts::{self, READY_SENTINEL};

/// One line of the planning conversation.
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    pub timestamp: DateTime<Utc>,
    pub role: AgentRole,
    pub text: String,
}

impl TranscriptEntry {
    /// Speaker label, e.g. `"Travel Guide"`.
    pub fn speaker(&self) -> &'static str {
        self.role.display_name()
    }
}

/// Why high-level planning stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The round budget was spent.
    MaxRounds,
    /// The critic emitted the ready marker.
    Sentinel,
    /// The given agent ended the exchange.
    Terminated(AgentRole),
}

/// Append-only log of a planning session.
#[derive(Debug, Clone)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    rounds: usize,
    stop_reason: StopReason,
}

impl Transcript {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            rounds: 0,
            stop_reason: StopReason::MaxRounds,
        }
    }

    pub(crate) fn push(&mut self, role: AgentRole, text: impl Into<String>) {
        self.entries.push(TranscriptEntry {
            timestamp: Utc::now(),
            role,
            text: text.into(),
        });
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TranscriptEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of rounds started (the last one may be partial).
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn stop_reason(&self) -> StopReason {
        self.stop_reason
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a TranscriptEntry;
    type IntoIter = std::slice::Iter<'a, TranscriptEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Render the transcript as the numbered summary handed to the organizer.
///
/// ```
/// # use itinera::planner::compile_planning_summary;
/// # use itinera::planner::Transcript;
/// # fn demo(transcript: &Transcript) {
/// let summary = compile_planning_summary(transcript);
/// // "1. Travel Guide:\n...\n\n2. Traveller:\n...\n"
/// # }
/// ```
pub fn compile_planning_summary(transcript: &Transcript) -> String {
    transcript
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("{}. {}:\n{}\n", i + 1, entry.speaker(), entry.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The four-agent planning controller.
pub struct TravelPlanner {
    guide: Agent,
    traveller: Agent,
    critic: Agent,
    organizer: Agent,
    event_handler: Option<Arc<dyn EventHandler>>,
    session_id: String,
}

impl TravelPlanner {
    /// Build a planner from one backend per role, using each role's built-in instruction.
    pub fn new(
        guide: Arc<dyn ClientWrapper>,
        traveller: Arc<dyn ClientWrapper>,
        critic: Arc<dyn ClientWrapper>,
        organizer: Arc<dyn ClientWrapper>,
    ) -> Self {
        Self::assemble(
            Agent::new(AgentRole::Guide, guide),
            Agent::new(AgentRole::Traveller, traveller),
            Agent::new(AgentRole::Critic, critic),
            Agent::new(AgentRole::Organizer, organizer),
        )
    }

    /// Build a planner from fully configured agents.
    ///
    /// Fails with [`PlannerError::RoleMismatch`] if an agent's role does not match its slot.
    pub fn from_agents(
        guide: Agent,
        traveller: Agent,
        critic: Agent,
        organizer: Agent,
    ) -> Result<Self, PlannerError> {
        for (expected, agent) in [
            (AgentRole::Guide, &guide),
            (AgentRole::Traveller, &traveller),
            (AgentRole::Critic, &critic),
            (AgentRole::Organizer, &organizer),
        ] {
            if agent.role() != expected {
                return Err(PlannerError::RoleMismatch {
                    expected,
                    found: agent.role(),
                });
            }
        }
        Ok(Self::assemble(guide, traveller, critic, organizer))
    }

    fn assemble(guide: Agent, traveller: Agent, critic: Agent, organizer: Agent) -> Self {
        Self {
            guide,
            traveller,
            critic,
            organizer,
            event_handler: None,
            session_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Build OpenAI-backed agents with the per-role models of `config`.
    pub fn from_config(config: &ItineraConfig) -> Self {
        let client = |model: &str| -> Arc<dyn ClientWrapper> {
            match &config.openai_base_url {
                Some(base_url) => Arc::new(OpenAIClient::new_with_base_url(
                    &config.openai_api_key,
                    model,
                    base_url,
                )),
                None => Arc::new(OpenAIClient::new_with_model_string(
                    &config.openai_api_key,
                    model,
                )),
            }
        };
        Self::new(
            client(&config.models.guide),
            client(&config.models.traveller),
            client(&config.models.critic),
            client(&config.models.organizer),
        )
    }

    /// Attach an [`EventHandler`] (builder pattern).
    pub fn with_event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// Identifier stamped on every [`PlannerEvent`] of this planner.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn agent(&self, role: AgentRole) -> &Agent {
        match role {
            AgentRole::Guide => &self.guide,
            AgentRole::Traveller => &self.traveller,
            AgentRole::Critic => &self.critic,
            AgentRole::Organizer => &self.organizer,
        }
    }

    async fn emit(&self, event: PlannerEvent) {
        if let Some(handler) = &self.event_handler {
            handler.on_planner_event(&event).await;
        }
    }

    /// Run high-level planning, then expand the result into a detailed itinerary.
    ///
    /// Returns `Ok(None)` when planning produced no transcript; the organizer is not called in
    /// that case.
    pub async fn run_session(
        &mut self,
        initial_request: &str,
        max_rounds: usize,
    ) -> Result<Option<String>, PlannerError> {
        if max_rounds == 0 {
            return Err(PlannerError::InvalidRounds(max_rounds));
        }

        let preview: String = initial_request.chars().take(120).collect();
        self.emit(PlannerEvent::SessionStarted {
            session_id: self.session_id.clone(),
            max_rounds,
            request_preview: preview,
        })
        .await;

        let transcript = self.plan_high_level(initial_request, max_rounds).await?;

        let itinerary = if transcript.is_empty() {
            log::info!("TravelPlanner: empty transcript, skipping itinerary expansion");
            None
        } else {
            Some(self.expand_detailed_itinerary(&transcript).await?)
        };

        self.emit(PlannerEvent::SessionCompleted {
            session_id: self.session_id.clone(),
            produced_itinerary: itinerary.is_some(),
        })
        .await;

        Ok(itinerary)
    }

    /// Phase 1: bounded guide → traveller → critic rounds.
    pub async fn plan_high_level(
        &mut self,
        initial_request: &str,
        max_rounds: usize,
    ) -> Result<Transcript, PlannerError> {
        if max_rounds == 0 {
            return Err(PlannerError::InvalidRounds(max_rounds));
        }

        let mut transcript = Transcript::new();
        // The opening request speaks for the traveller.
        let mut current_message = initial_request.to_string();

        while transcript.rounds < max_rounds {
            transcript.rounds += 1;
            let round = transcript.rounds;
            log::info!("TravelPlanner: round {}/{}", round, max_rounds);
            self.emit(PlannerEvent::RoundStarted {
                session_id: self.session_id.clone(),
                round,
            })
            .await;

            let guide = self.guide.step(&current_message).await?;
            if self.record(&mut transcript, AgentRole::Guide, &guide, round).await {
                break;
            }

            let traveller = self.traveller.step(&guide.content).await?;
            if self
                .record(&mut transcript, AgentRole::Traveller, &traveller, round)
                .await
            {
                break;
            }

            let context = prompts::critic_context(&guide.content, &traveller.content);
            let critic = self.critic.step(&context).await?;
            transcript.push(AgentRole::Critic, critic.content.as_str());
            self.emit_responded(AgentRole::Critic, &critic, round).await;

            if critic.content.contains(READY_SENTINEL) {
                log::info!("TravelPlanner: critic marked the plan ready in round {}", round);
                transcript.stop_reason = StopReason::Sentinel;
                self.emit(PlannerEvent::SentinelDetected {
                    session_id: self.session_id.clone(),
                    round,
                })
                .await;
                break;
            }
            if critic.terminated {
                self.stop_terminated(&mut transcript, AgentRole::Critic, round)
                    .await;
                break;
            }

            current_message = critic.content;
        }

        log::info!(
            "TravelPlanner: high-level planning finished after {} round(s), {} entries ({:?})",
            transcript.rounds,
            transcript.len(),
            transcript.stop_reason
        );
        self.emit(PlannerEvent::PhaseOneCompleted {
            session_id: self.session_id.clone(),
            rounds: transcript.rounds,
            transcript_len: transcript.len(),
            stop_reason: transcript.stop_reason,
        })
        .await;

        Ok(transcript)
    }

    /// Phase 2: one organizer call over the numbered transcript summary.
    pub async fn expand_detailed_itinerary(
        &mut self,
        transcript: &Transcript,
    ) -> Result<String, PlannerError> {
        let summary = compile_planning_summary(transcript);
        self.emit(PlannerEvent::ItineraryRequested {
            session_id: self.session_id.clone(),
            summary_length: summary.len(),
        })
        .await;

        let request = prompts::organizer_request(&summary);
        let response = self.organizer.step(&request).await?;
        if response.terminated {
            log::warn!("TravelPlanner: organizer terminated before producing an itinerary");
        }
        Ok(response.content)
    }

    /// Append a guide/traveller reply; returns true when the agent terminated.
    async fn record(
        &self,
        transcript: &mut Transcript,
        role: AgentRole,
        response: &AgentResponse,
        round: usize,
    ) -> bool {
        transcript.push(role, response.content.as_str());
        self.emit_responded(role, response, round).await;
        if response.terminated {
            self.stop_terminated(transcript, role, round).await;
        }
        response.terminated
    }

    async fn emit_responded(&self, role: AgentRole, response: &AgentResponse, round: usize) {
        log::debug!(
            "TravelPlanner: {} replied with {} chars",
            role,
            response.content.len()
        );
        self.emit(PlannerEvent::AgentResponded {
            session_id: self.session_id.clone(),
            round,
            role,
            response_length: response.content.len(),
        })
        .await;
    }

    async fn stop_terminated(&self, transcript: &mut Transcript, role: AgentRole, round: usize) {
        log::info!("TravelPlanner: {} ended the exchange in round {}", role, round);
        transcript.stop_reason = StopReason::Terminated(role);
        self.emit(PlannerEvent::AgentTerminated {
            session_id: self.session_id.clone(),
            round,
            role,
        })
        .await;
    }
}
