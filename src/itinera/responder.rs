//! Search-augmented question answering.
//!
//! [`SearchResponder`] answers one question in at most four backend calls:
//!
//! 1. classify: does the question need live information? (`needs_search`)
//! 2. refine the question into a short search query (only if 1 said yes)
//! 3. run the search (only if 1 said yes)
//! 4. answer, grounded on the search results whenever a search ran
//!
//! Every call is stateless: one system instruction plus one user turn. Failures of either
//! collaborator propagate; the responder never falls back to answering without a search that
//! failed.
//!
//! ```rust,no_run
//! use itinera::responder::SearchResponder;
//! use itinera::ItineraConfig;
//!
//! # async {
//! let responder = SearchResponder::from_config(&ItineraConfig::new("sk-...", "tvly-..."));
//! let answer = responder.respond("What events are on in Berlin this week?").await?;
//! println!("{}", answer);
//! # Ok::<(), itinera::error::ResponderError>(())
//! # };
//! ```

use std::sync::Arc;

use crate::itinera::client_wrapper::{ClientWrapper, Message};
use crate::itinera::clients::openai::OpenAIClient;
use crate::itinera::config::ItineraConfig;
use crate::itinera::error::ResponderError;
use crate::itinera::event::{EventHandler, ResponderEvent};
use crate::itinera::prompts;
use crate::itinera::search::tavily::TavilyClient;
use crate::itinera::search::{SearchClient, SearchDepth, SearchResponse};

/// Number of search records handed to the answering call.
pub const MAX_CONTEXT_RESULTS: usize = 3;

const CLASSIFIER_MAX_TOKENS: usize = 10;
const REFINER_MAX_TOKENS: usize = 50;

/// Answer plus the trace of how it was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponderReply {
    pub answer: String,
    /// The refined query, when a search was run.
    pub search_query: Option<String>,
    pub result_count: usize,
}

pub struct SearchResponder {
    client: Arc<dyn ClientWrapper>,
    search: Arc<dyn SearchClient>,
    event_handler: Option<Arc<dyn EventHandler>>,
}

impl SearchResponder {
    pub fn new(client: Arc<dyn ClientWrapper>, search: Arc<dyn SearchClient>) -> Self {
        Self {
            client,
            search,
            event_handler: None,
        }
    }

    /// OpenAI client on `responder_model` plus a Tavily client.
    pub fn from_config(config: &ItineraConfig) -> Self {
        let client: Arc<dyn ClientWrapper> = match &config.openai_base_url {
            Some(base_url) => Arc::new(OpenAIClient::new_with_base_url(
                &config.openai_api_key,
                &config.responder_model,
                base_url,
            )),
            None => Arc::new(OpenAIClient::new_with_model_string(
                &config.openai_api_key,
                &config.responder_model,
            )),
        };
        let search = Arc::new(TavilyClient::with_base_url(
            &config.tavily_api_key,
            &config.tavily_base_url,
        ));
        Self::new(client, search)
    }

    pub fn with_event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    async fn emit(&self, event: ResponderEvent) {
        if let Some(handler) = &self.event_handler {
            handler.on_responder_event(&event).await;
        }
    }

    async fn ask(
        &self,
        instruction: &str,
        user_turn: String,
        max_output_tokens: Option<usize>,
    ) -> Result<String, ResponderError> {
        let messages = [Message::system(instruction), Message::user(user_turn)];
        let reply = self.client.send_message(&messages, max_output_tokens).await?;
        Ok(reply.content.to_string())
    }

    /// Ask the classifier whether `question` needs live web information.
    ///
    /// Only a (case-insensitive) "yes", optionally followed by a period, counts as yes.
    pub async fn needs_search(&self, question: &str) -> Result<bool, ResponderError> {
        let verdict = self
            .ask(
                prompts::SEARCH_CLASSIFIER_PROMPT,
                prompts::classifier_question(question),
                Some(CLASSIFIER_MAX_TOKENS),
            )
            .await?;
        let needs = is_affirmative(&verdict);
        log::debug!(
            "SearchResponder::needs_search(...): classifier said {:?} -> {}",
            verdict,
            needs
        );
        Ok(needs)
    }

    /// Turn the question into a short search query.
    pub async fn refine_query(&self, question: &str) -> Result<String, ResponderError> {
        let query = self
            .ask(
                prompts::QUERY_REFINER_PROMPT,
                prompts::refine_request(question),
                Some(REFINER_MAX_TOKENS),
            )
            .await?;
        Ok(query.trim().to_string())
    }

    pub async fn search(&self, query: &str) -> Result<SearchResponse, ResponderError> {
        Ok(self
            .search
            .search(query, SearchDepth::Advanced, false)
            .await?)
    }

    /// Produce the final answer. Any result set, even one with no records, selects the
    /// cite-your-sources instruction; only `None` answers from prior knowledge.
    pub async fn answer(
        &self,
        question: &str,
        results: Option<&SearchResponse>,
    ) -> Result<String, ResponderError> {
        match results {
            Some(results) => {
                let context = format_search_context(results);
                self.ask(
                    prompts::ANSWER_WITH_RESULTS_PROMPT,
                    prompts::answer_with_results(question, &context),
                    None,
                )
                .await
            }
            None => {
                self.ask(
                    prompts::ANSWER_FROM_KNOWLEDGE_PROMPT,
                    prompts::answer_from_knowledge(question),
                    None,
                )
                .await
            }
        }
    }

    /// Classify, optionally refine and search, then answer.
    pub async fn respond(&self, question: &str) -> Result<String, ResponderError> {
        Ok(self.respond_detailed(question, None).await?.answer)
    }

    /// Like [`respond`](Self::respond), with optional itinerary text placed ahead of the
    /// question in the answering call only.
    pub async fn respond_with_context(
        &self,
        question: &str,
        itinerary_context: Option<&str>,
    ) -> Result<String, ResponderError> {
        Ok(self
            .respond_detailed(question, itinerary_context)
            .await?
            .answer)
    }

    pub async fn respond_detailed(
        &self,
        question: &str,
        itinerary_context: Option<&str>,
    ) -> Result<ResponderReply, ResponderError> {
        log::info!("User: {}", question);
        self.emit(ResponderEvent::QuestionReceived {
            question: question.to_string(),
        })
        .await;

        let needs_search = self.needs_search(question).await?;
        self.emit(ResponderEvent::SearchDecided { needs_search }).await;

        let mut search_query = None;
        let mut results = None;
        if needs_search {
            let query = self.refine_query(question).await?;
            log::info!("Searching for: {}", query);
            self.emit(ResponderEvent::SearchQueryRefined {
                query: query.clone(),
            })
            .await;

            let response = self.search(&query).await?;
            self.emit(ResponderEvent::SearchCompleted {
                query: query.clone(),
                result_count: response.results.len(),
            })
            .await;
            search_query = Some(query);
            results = Some(response);
        }

        let final_question = match itinerary_context.filter(|ctx| !ctx.trim().is_empty()) {
            Some(ctx) => prompts::with_itinerary_context(ctx, question),
            None => question.to_string(),
        };
        let answer = self.answer(&final_question, results.as_ref()).await?;
        let result_count = results.as_ref().map_or(0, |r| r.results.len());
        let used_search = result_count > 0;

        log::info!("Assistant: {}", answer);
        self.emit(ResponderEvent::AnswerGenerated {
            used_search,
            answer_length: answer.len(),
        })
        .await;

        Ok(ResponderReply {
            answer,
            search_query,
            result_count,
        })
    }
}

fn is_affirmative(verdict: &str) -> bool {
    let normalized = verdict.trim().to_lowercase();
    normalized.trim_end_matches('.') == "yes"
}

/// Render the first [`MAX_CONTEXT_RESULTS`] records for the answering call.
pub fn format_search_context(results: &SearchResponse) -> String {
    results
        .results
        .iter()
        .take(MAX_CONTEXT_RESULTS)
        .map(|r| {
            format!(
                "Title: {}\nContent: {}\nURL: {}\n\n",
                r.title.as_deref().unwrap_or("No title"),
                r.content.as_deref().unwrap_or("No content"),
                r.url.as_deref().unwrap_or("No URL"),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itinera::search::SearchResult;

    #[test]
    fn test_affirmative_normalisation() {
        assert!(is_affirmative("Yes."));
        assert!(is_affirmative("  YES \n"));
        assert!(!is_affirmative("No"));
        assert!(!is_affirmative("maybe"));
        assert!(!is_affirmative("yes, definitely"));
    }

    #[test]
    fn test_context_caps_records_and_fills_placeholders() {
        let mut results = vec![SearchResult {
            title: None,
            content: Some("Gate reopens".into()),
            url: None,
            score: None,
        }];
        for i in 0..4 {
            results.push(SearchResult {
                title: Some(format!("t{}", i)),
                content: Some(format!("c{}", i)),
                url: Some(format!("https://example.com/{}", i)),
                score: Some(0.5),
            });
        }
        let context = format_search_context(&SearchResponse {
            query: "q".into(),
            results,
        });

        assert!(context.starts_with("Title: No title\nContent: Gate reopens\nURL: No URL\n\n"));
        assert_eq!(context.matches("Title: ").count(), MAX_CONTEXT_RESULTS);
        assert!(context.contains("t1"));
        assert!(!context.contains("t2"));
    }
}
