use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use itinera::{ItineraConfig, SearchResponder, TravelPlanner};

#[derive(Parser)]
#[command(name = "itinera", version, about = "Multi-agent trip planning and search-augmented Q&A")]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Plan a trip with the guide, traveller, critic and organizer agents
    Plan {
        /// Travel request, e.g. "I want to plan a 3-day trip to Kyoto"
        request: String,

        #[arg(long, default_value_t = 2)]
        max_rounds: usize,
    },
    /// Answer a question, searching the web when needed
    Ask {
        question: String,

        /// File with an itinerary to answer against
        #[arg(long)]
        context: Option<PathBuf>,
    },
    /// Run the HTTP backend
    #[cfg(feature = "http-server")]
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: std::net::SocketAddr,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose && std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "debug");
    }
    itinera::init_logger();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    let config = ItineraConfig::from_env()?;

    match command {
        Command::Plan {
            request,
            max_rounds,
        } => {
            let mut planner = TravelPlanner::from_config(&config);
            match planner.run_session(&request, max_rounds).await? {
                Some(itinerary) => println!("{}", itinerary),
                None => println!("No itinerary generated"),
            }
        }
        Command::Ask { question, context } => {
            let itinerary = match context {
                Some(path) => Some(std::fs::read_to_string(&path).map_err(|err| {
                    format!("could not read context file {}: {}", path.display(), err)
                })?),
                None => None,
            };

            println!("User: {}", question);
            let reply = SearchResponder::from_config(&config)
                .respond_detailed(&question, itinerary.as_deref())
                .await?;
            if let Some(query) = &reply.search_query {
                println!("Searching for: {}", query);
            }
            println!("Assistant: {}", reply.answer);
        }
        #[cfg(feature = "http-server")]
        Command::Serve { addr } => {
            itinera::server::serve(config, addr).await?;
        }
    }

    Ok(())
}
