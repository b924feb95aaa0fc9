//! End-to-end behaviour of the search pipeline: session + worker + scroll feed,
//! driven with a scripted photo source and synthetic instants.

use snapgrid::{
    FetchOutcome, FetchWorker, Photo, PhotoSource, ScrollFeed, ScrollMetrics, SearchPage,
    SearchSession, SnapgridError,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const DEBOUNCE: Duration = Duration::from_millis(300);
const WAIT: Duration = Duration::from_secs(5);

type Reply = Box<dyn Fn() -> snapgrid::Result<SearchPage> + Send + Sync>;

/// Source answering from a table of (query, page) replies and recording every call
#[derive(Default)]
struct ScriptedSource {
    replies: HashMap<(String, u32), Reply>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl ScriptedSource {
    fn reply(mut self, query: &str, page: u32, ids: &[&str], total_pages: u32) -> Self {
        let results: Vec<Photo> = ids
            .iter()
            .map(|id| Photo::new(*id, format!("https://images.test/{}", id)))
            .collect();
        self.replies.insert(
            (query.to_string(), page),
            Box::new(move || {
                Ok(SearchPage {
                    results: results.clone(),
                    total_pages,
                    total: None,
                })
            }),
        );
        self
    }

    fn fail(mut self, query: &str, page: u32, status: u16) -> Self {
        self.replies.insert(
            (query.to_string(), page),
            Box::new(move || Err(SnapgridError::from_status(status, "Internal Server Error"))),
        );
        self
    }

    fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

impl PhotoSource for ScriptedSource {
    fn search(&self, query: &str, page: u32) -> snapgrid::Result<SearchPage> {
        self.calls.lock().unwrap().push((query.to_string(), page));
        match self.replies.get(&(query.to_string(), page)) {
            Some(reply) => reply(),
            None => Ok(SearchPage {
                results: Vec::new(),
                total_pages: 0,
                total: None,
            }),
        }
    }
}

struct Harness {
    session: SearchSession,
    worker: FetchWorker,
    source: Arc<ScriptedSource>,
    now: Instant,
}

impl Harness {
    fn new(source: ScriptedSource) -> Self {
        let source = Arc::new(source);
        let dyn_source: Arc<dyn PhotoSource> = source.clone();
        Self {
            session: SearchSession::new(DEBOUNCE, 1.0),
            worker: FetchWorker::new(dyn_source),
            source,
            now: Instant::now(),
        }
    }

    fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    fn type_text(&mut self, text: &str) {
        self.session.set_query(text, self.now);
    }

    /// Poll the session and dispatch any request that fires
    fn tick(&mut self) -> bool {
        match self.session.poll(self.now) {
            Some(request) => {
                self.worker.dispatch(request);
                true
            }
            None => false,
        }
    }

    /// Wait for one response and apply it
    fn settle(&mut self) -> FetchOutcome {
        let response = self.worker.recv_timeout(WAIT).expect("response within timeout");
        self.session.complete(&response.request, response.result)
    }

    fn ids(&self) -> Vec<&str> {
        self.session.results().ids()
    }
}

#[test]
fn empty_query_never_reaches_the_network() {
    let mut h = Harness::new(ScriptedSource::default());
    h.type_text("c");
    h.advance(Duration::from_millis(100));
    h.type_text("");
    h.advance(DEBOUNCE);

    assert!(!h.tick());
    assert!(h.session.results().is_empty());
    assert!(!h.session.is_loading());
    assert!(h.source.calls().is_empty());
}

#[test]
fn typing_burst_sends_only_the_final_query() {
    let mut h = Harness::new(ScriptedSource::default().reply("cats", 1, &["a"], 1));
    for text in ["c", "ca", "cat", "cats"] {
        h.type_text(text);
        assert!(!h.tick());
        h.advance(Duration::from_millis(120));
    }
    h.advance(DEBOUNCE);
    assert!(h.tick());
    assert_eq!(h.settle(), FetchOutcome::Applied { added: 1 });

    assert_eq!(h.source.calls(), vec![("cats".to_string(), 1)]);
}

#[test]
fn scrolling_to_the_bottom_appends_the_next_page() {
    let mut h = Harness::new(
        ScriptedSource::default()
            .reply("cats", 1, &["a"], 3)
            .reply("cats", 2, &["b", "a"], 3),
    );
    let feed = ScrollFeed::new();
    let mut events = feed.subscribe();

    h.type_text("cats");
    h.advance(DEBOUNCE);
    h.tick();
    assert!(h.session.is_loading());
    h.settle();
    assert!(!h.session.is_loading());
    assert_eq!(h.ids(), vec!["a"]);

    h.advance(Duration::from_secs(1));
    feed.publish(ScrollMetrics::new(200.0, 600.0, 800.0));
    let metrics = events.next_event().unwrap();
    assert!(h.session.on_scroll(&metrics, h.now));
    assert_eq!(h.session.page(), 2);

    h.advance(DEBOUNCE);
    h.tick();
    assert_eq!(h.settle(), FetchOutcome::Applied { added: 1 });
    assert_eq!(h.ids(), vec!["a", "b"]);
}

#[test]
fn page_past_the_end_leaves_results_alone() {
    let mut h = Harness::new(
        ScriptedSource::default()
            .reply("cats", 1, &["a"], 1)
            .reply("cats", 2, &["zzz"], 1),
    );
    h.type_text("cats");
    h.advance(DEBOUNCE);
    h.tick();
    h.settle();

    // force the cursor past the last page
    h.session.next_page(h.now);
    h.advance(DEBOUNCE);
    h.tick();
    assert_eq!(h.settle(), FetchOutcome::OutOfRange);
    assert_eq!(h.ids(), vec!["a"]);
    assert!(!h.session.is_loading());
}

#[test]
fn server_error_sets_message_and_keeps_results_empty() {
    let mut h = Harness::new(ScriptedSource::default().fail("cats", 1, 500));
    h.type_text("cats");
    h.advance(DEBOUNCE);
    h.tick();
    assert_eq!(h.settle(), FetchOutcome::Failed);

    assert!(h.session.error().contains("500"));
    assert!(h.session.results().is_empty());
    assert!(!h.session.is_loading());
}

#[test]
fn switching_query_discards_the_in_flight_response() {
    let mut h = Harness::new(
        ScriptedSource::default()
            .reply("cats", 1, &["cat-1", "cat-2"], 5)
            .reply("dogs", 1, &["dog-1"], 5),
    );
    h.type_text("cats");
    h.advance(DEBOUNCE);
    h.tick();

    // switch before the cats response is applied
    h.type_text("dogs");
    assert_eq!(h.session.page(), 1);
    assert!(h.session.results().is_empty());
    assert!(!h.session.is_loading());

    assert_eq!(h.settle(), FetchOutcome::Stale);
    assert!(h.session.results().is_empty());

    h.advance(DEBOUNCE);
    h.tick();
    assert_eq!(h.settle(), FetchOutcome::Applied { added: 1 });
    assert_eq!(h.ids(), vec!["dog-1"]);
}

#[test]
fn query_change_resets_page_before_any_new_fetch() {
    let mut h = Harness::new(
        ScriptedSource::default()
            .reply("cats", 1, &["a"], 3)
            .reply("cats", 2, &["b"], 3)
            .reply("dogs", 1, &["d"], 3),
    );
    h.type_text("cats");
    h.advance(DEBOUNCE);
    h.tick();
    h.settle();
    h.advance(Duration::from_secs(1));
    h.session.next_page(h.now);
    h.advance(DEBOUNCE);
    h.tick();
    h.settle();
    assert_eq!(h.ids(), vec!["a", "b"]);

    h.type_text("dogs");
    assert_eq!(h.session.page(), 1);
    assert!(h.session.results().is_empty());

    h.advance(DEBOUNCE);
    h.tick();
    h.settle();
    assert_eq!(h.ids(), vec!["d"]);
    assert_eq!(h.source.calls().last(), Some(&("dogs".to_string(), 1)));
}
