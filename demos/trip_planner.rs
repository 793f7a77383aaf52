//! Plan a trip end to end and print every planner event as it happens.
//!
//! ```text
//! OPENAI_API_KEY=... TAVILY_API_KEY=... cargo run --example trip_planner
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use itinera::{EventHandler, ItineraConfig, PlannerEvent, TravelPlanner};

struct ProgressPrinter;

#[async_trait]
impl EventHandler for ProgressPrinter {
    async fn on_planner_event(&self, event: &PlannerEvent) {
        match event {
            PlannerEvent::RoundStarted { round, .. } => println!("\n=== Round {} ===", round),
            PlannerEvent::AgentResponded {
                role,
                response_length,
                ..
            } => println!("  {} replied ({} chars)", role, response_length),
            PlannerEvent::SentinelDetected { round, .. } => {
                println!("  Critic is satisfied after round {}", round)
            }
            PlannerEvent::ItineraryRequested { summary_length, .. } => println!(
                "\nHanding {} chars of discussion to the organizer...",
                summary_length
            ),
            _ => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    itinera::init_logger();

    let config = ItineraConfig::from_env()?;
    let mut planner =
        TravelPlanner::from_config(&config).with_event_handler(Arc::new(ProgressPrinter));

    let request = "I want to plan a 3-day trip to Kyoto, Japan. I love temples, food and walking.";
    match planner.run_session(request, 2).await? {
        Some(itinerary) => println!("\n{}", itinerary),
        None => println!("No itinerary generated"),
    }
    Ok(())
}
