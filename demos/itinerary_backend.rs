//! Serve the itinerary web front end's backend on 127.0.0.1:8080.
//!
//! ```text
//! cargo run --example itinerary_backend --features http-server
//! curl -s localhost:8080/api/chat -H 'content-type: application/json' \
//!      -d '{"question":"Is the Golden Pavilion open on Mondays?"}'
//! ```

use itinera::ItineraConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    itinera::init_logger();

    let config = ItineraConfig::from_env()?.with_max_rounds(3);
    itinera::server::serve(config, "127.0.0.1:8080".parse()?).await?;
    Ok(())
}
