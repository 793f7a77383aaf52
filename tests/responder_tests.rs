use async_trait::async_trait;
use itinera::client_wrapper::{ClientWrapper, Message};
use itinera::error::{LlmError, ResponderError, SearchError};
use itinera::event::{EventHandler, ResponderEvent};
use itinera::prompts;
use itinera::responder::SearchResponder;
use itinera::search::{SearchClient, SearchDepth, SearchResponse, SearchResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Records (messages, max_output_tokens) of every call and replies in script order.
struct ScriptedLlm {
    responses: Vec<&'static str>,
    call_count: AtomicUsize,
    requests: Mutex<Vec<(Vec<Message>, Option<usize>)>>,
}

impl ScriptedLlm {
    fn new(responses: &[&'static str]) -> Arc<Self> {
        Arc::new(Self {
            responses: responses.to_vec(),
            call_count: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientWrapper for ScriptedLlm {
    async fn send_message(
        &self,
        messages: &[Message],
        max_output_tokens: Option<usize>,
    ) -> Result<Message, LlmError> {
        let index = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .await
            .push((messages.to_vec(), max_output_tokens));
        self.responses
            .get(index)
            .map(|response| Message::assistant(response))
            .ok_or_else(|| LlmError::Api("script exhausted".to_string()))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

struct FakeSearch {
    results: Vec<SearchResult>,
    fail: bool,
    queries: Mutex<Vec<(String, SearchDepth, bool)>>,
}

impl FakeSearch {
    fn with_results(results: Vec<SearchResult>) -> Arc<Self> {
        Arc::new(Self {
            results,
            fail: false,
            queries: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            results: Vec::new(),
            fail: true,
            queries: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl SearchClient for FakeSearch {
    async fn search(
        &self,
        query: &str,
        depth: SearchDepth,
        include_images: bool,
    ) -> Result<SearchResponse, SearchError> {
        self.queries
            .lock()
            .await
            .push((query.to_string(), depth, include_images));
        if self.fail {
            return Err(SearchError::Api {
                status: 432,
                message: "plan limit exceeded".to_string(),
            });
        }
        Ok(SearchResponse {
            query: query.to_string(),
            results: self.results.clone(),
        })
    }
}

fn hit(title: &str) -> SearchResult {
    SearchResult {
        title: Some(title.to_string()),
        content: Some(format!("{} content", title)),
        url: Some(format!("https://example.com/{}", title)),
        score: Some(0.9),
    }
}

#[tokio::test]
async fn test_classifier_normalisation() {
    for (verdict, expected) in [("Yes.", true), ("yes", true), ("No", false), ("maybe", false)] {
        let llm = ScriptedLlm::new(&[verdict]);
        let responder = SearchResponder::new(llm.clone(), FakeSearch::with_results(vec![]));

        assert_eq!(
            responder.needs_search("Is the Louvre open today?").await.unwrap(),
            expected,
            "verdict {:?}",
            verdict
        );

        let requests = llm.requests.lock().await;
        let (messages, max_tokens) = &requests[0];
        assert_eq!(*max_tokens, Some(10));
        assert_eq!(&*messages[0].content, prompts::SEARCH_CLASSIFIER_PROMPT);
        assert_eq!(
            &*messages[1].content,
            "Does this question require searching the internet for up-to-date information? Question: Is the Louvre open today?"
        );
    }
}

#[tokio::test]
async fn test_refine_query_trims_output() {
    let llm = ScriptedLlm::new(&["  louvre opening hours \n"]);
    let responder = SearchResponder::new(llm.clone(), FakeSearch::with_results(vec![]));

    let query = responder.refine_query("When is the Louvre open?").await.unwrap();

    assert_eq!(query, "louvre opening hours");
    let requests = llm.requests.lock().await;
    assert_eq!(requests[0].1, Some(50));
    assert_eq!(
        &*requests[0].0[1].content,
        "Create a search query for: When is the Louvre open?"
    );
}

#[tokio::test]
async fn test_answer_uses_at_most_three_records() {
    let llm = ScriptedLlm::new(&["Here is what I found [1]."]);
    let responder = SearchResponder::new(llm.clone(), FakeSearch::with_results(vec![]));
    let results = SearchResponse {
        query: "q".to_string(),
        results: vec![
            SearchResult::default(),
            hit("second"),
            hit("third"),
            hit("fourth"),
        ],
    };

    responder.answer("What's on?", Some(&results)).await.unwrap();

    let requests = llm.requests.lock().await;
    let messages = &requests[0].0;
    assert_eq!(&*messages[0].content, prompts::ANSWER_WITH_RESULTS_PROMPT);
    let user_turn = &*messages[1].content;
    assert!(user_turn.starts_with(
        "Question: What's on?\n\nSearch results:\nTitle: No title\nContent: No content\nURL: No URL\n\n"
    ));
    assert!(user_turn.contains("Title: third\n"));
    assert!(!user_turn.contains("fourth"));
}

#[tokio::test]
async fn test_answer_without_results_uses_prior_knowledge() {
    let llm = ScriptedLlm::new(&["It fell on 9 November 1989."]);
    let responder = SearchResponder::new(llm.clone(), FakeSearch::with_results(vec![]));

    responder
        .answer("When did the Berlin Wall fall?", None)
        .await
        .unwrap();

    let requests = llm.requests.lock().await;
    assert_eq!(&*requests[0].0[0].content, prompts::ANSWER_FROM_KNOWLEDGE_PROMPT);
    assert_eq!(
        &*requests[0].0[1].content,
        "Question: When did the Berlin Wall fall?"
    );
}

#[tokio::test]
async fn test_answer_with_empty_result_set_still_cites_sources() {
    let llm = ScriptedLlm::new(&["I could not find anything current."]);
    let responder = SearchResponder::new(llm.clone(), FakeSearch::with_results(vec![]));
    let empty = SearchResponse {
        query: "louvre strike".to_string(),
        results: vec![],
    };

    responder
        .answer("Is the Louvre closed today?", Some(&empty))
        .await
        .unwrap();

    let requests = llm.requests.lock().await;
    assert_eq!(&*requests[0].0[0].content, prompts::ANSWER_WITH_RESULTS_PROMPT);
    assert_eq!(
        &*requests[0].0[1].content,
        "Question: Is the Louvre closed today?\n\nSearch results:\n"
    );
}

#[tokio::test]
async fn test_respond_with_empty_search_answers_from_results_prompt() {
    let llm = ScriptedLlm::new(&["yes", "louvre strike", "Nothing reported."]);
    let search = FakeSearch::with_results(vec![]);
    let responder = SearchResponder::new(llm.clone(), search);

    let reply = responder
        .respond_detailed("Is the Louvre closed today?", None)
        .await
        .unwrap();

    assert_eq!(reply.search_query.as_deref(), Some("louvre strike"));
    assert_eq!(reply.result_count, 0);
    let requests = llm.requests.lock().await;
    assert_eq!(&*requests[2].0[0].content, prompts::ANSWER_WITH_RESULTS_PROMPT);
}

#[tokio::test]
async fn test_berlin_wall_skips_refine_and_search() {
    let llm = ScriptedLlm::new(&["no", "The Berlin Wall fell on 9 November 1989."]);
    let search = FakeSearch::with_results(vec![hit("unused")]);
    let responder = SearchResponder::new(llm.clone(), search.clone());

    let reply = responder
        .respond_detailed("When did the Berlin Wall fall?", None)
        .await
        .unwrap();

    assert_eq!(reply.answer, "The Berlin Wall fell on 9 November 1989.");
    assert_eq!(reply.search_query, None);
    assert_eq!(llm.calls(), 2);
    assert!(search.queries.lock().await.is_empty());
}

#[tokio::test]
async fn test_search_path_runs_four_steps() {
    let llm = ScriptedLlm::new(&["Yes", "berlin events", "Berghain and a museum night [1]."]);
    let search = FakeSearch::with_results(vec![hit("events")]);
    let responder = SearchResponder::new(llm.clone(), search.clone());

    let answer = responder
        .respond("What events are on in Berlin this week?")
        .await
        .unwrap();

    assert_eq!(answer, "Berghain and a museum night [1].");
    assert_eq!(llm.calls(), 3);
    let queries = search.queries.lock().await;
    assert_eq!(
        *queries,
        vec![("berlin events".to_string(), SearchDepth::Advanced, false)]
    );
    let requests = llm.requests.lock().await;
    assert!(requests[2].0[1].content.contains("Title: events\n"));
}

#[tokio::test]
async fn test_itinerary_context_only_reaches_answer_call() {
    let llm = ScriptedLlm::new(&["yes", "kinkakuji hours", "Open 9:00-17:00."]);
    let search = FakeSearch::with_results(vec![hit("kinkakuji")]);
    let responder = SearchResponder::new(llm.clone(), search);

    responder
        .respond_with_context("Is it open Monday?", Some("Day 2: Kinkaku-ji"))
        .await
        .unwrap();

    let requests = llm.requests.lock().await;
    assert!(!requests[0].0[1].content.contains("Kinkaku-ji"));
    assert!(!requests[1].0[1].content.contains("Kinkaku-ji"));
    let final_turn = &*requests[2].0[1].content;
    assert!(final_turn.starts_with("Question: Itinerary context:\nDay 2: Kinkaku-ji\n"));
    assert!(final_turn.contains("Is it open Monday?"));
}

#[tokio::test]
async fn test_search_failure_propagates() {
    let llm = ScriptedLlm::new(&["yes", "paris strikes", "never reached"]);
    let responder = SearchResponder::new(llm.clone(), FakeSearch::failing());

    let err = responder.respond("Are there strikes in Paris today?").await.unwrap_err();

    assert!(matches!(
        err,
        ResponderError::Search(SearchError::Api { status: 432, .. })
    ));
    assert_eq!(llm.calls(), 2);
}

#[tokio::test]
async fn test_classifier_failure_propagates() {
    let llm = ScriptedLlm::new(&[]);
    let responder = SearchResponder::new(llm, FakeSearch::with_results(vec![]));

    let err = responder.respond("Anything").await.unwrap_err();
    assert!(matches!(err, ResponderError::Llm(LlmError::Api(_))));
}

#[derive(Default)]
struct RecordingHandler {
    events: Mutex<Vec<ResponderEvent>>,
}

#[async_trait]
impl EventHandler for RecordingHandler {
    async fn on_responder_event(&self, event: &ResponderEvent) {
        self.events.lock().await.push(event.clone());
    }
}

#[tokio::test]
async fn test_events_follow_search_path() {
    let llm = ScriptedLlm::new(&["yes", "tokyo weather", "Sunny."]);
    let handler = Arc::new(RecordingHandler::default());
    let responder = SearchResponder::new(llm, FakeSearch::with_results(vec![hit("weather")]))
        .with_event_handler(handler.clone());

    responder.respond("Weather in Tokyo tomorrow?").await.unwrap();

    let events = handler.events.lock().await;
    assert_eq!(events.len(), 5);
    assert!(matches!(events[1], ResponderEvent::SearchDecided { needs_search: true }));
    assert!(matches!(&events[2], ResponderEvent::SearchQueryRefined { query } if query == "tokyo weather"));
    assert!(matches!(events[3], ResponderEvent::SearchCompleted { result_count: 1, .. }));
    assert!(matches!(
        events[4],
        ResponderEvent::AnswerGenerated {
            used_search: true,
            ..
        }
    ));
}
