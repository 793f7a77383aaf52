//! Ask a couple of questions: one the model can answer alone, one that needs the web.

use itinera::{ItineraConfig, SearchResponder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    itinera::init_logger();

    let responder = SearchResponder::from_config(&ItineraConfig::from_env()?);

    for question in [
        "When did the Berlin Wall fall?",
        "What are the opening hours of the Louvre this weekend?",
    ] {
        println!("User: {}", question);
        let reply = responder.respond_detailed(question, None).await?;
        match &reply.search_query {
            Some(query) => println!("Searching for: {} ({} results)", query, reply.result_count),
            None => println!("(answered without searching)"),
        }
        println!("Assistant: {}\n", reply.answer);
    }
    Ok(())
}
