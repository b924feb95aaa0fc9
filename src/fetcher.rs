//! Background fetch worker
//!
//! Each [`FetchRequest`] runs on its own thread against a shared
//! [`PhotoSource`]. Finished requests come back over a channel that the UI
//! drains once per frame. Superseded requests are not cancelled; the session's
//! generation check makes their late arrival harmless.

use crate::api::PhotoSource;
use crate::error::{Result, SnapgridError};
use crate::photo::SearchPage;
use crate::search::FetchRequest;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// A finished request and its result
#[derive(Debug)]
pub struct FetchResponse {
    pub request: FetchRequest,
    pub result: Result<SearchPage>,
}

type Notify = Arc<dyn Fn() + Send + Sync>;

/// Runs searches off the UI thread
pub struct FetchWorker {
    source: Arc<dyn PhotoSource>,
    tx: Sender<FetchResponse>,
    rx: Receiver<FetchResponse>,
    notify: Option<Notify>,
}

impl FetchWorker {
    pub fn new(source: Arc<dyn PhotoSource>) -> Self {
        let (tx, rx) = unbounded();
        Self {
            source,
            tx,
            rx,
            notify: None,
        }
    }

    /// Callback invoked after every response is queued (the GUI wakes egui here)
    pub fn with_notify<F>(mut self, notify: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.notify = Some(Arc::new(notify));
        self
    }

    /// Start a request in the background
    pub fn dispatch(&self, request: FetchRequest) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let notify = self.notify.clone();
        let job = request.clone();

        let spawned = thread::Builder::new()
            .name(format!("fetch-{}", request.generation))
            .spawn(move || {
                let result = source.search(&job.query, job.page);
                let _ = tx.send(FetchResponse { request: job, result });
                if let Some(notify) = notify {
                    notify();
                }
            });

        if let Err(e) = spawned {
            log::error!("could not start fetch thread: {}", e);
            let _ = self.tx.send(FetchResponse {
                request,
                result: Err(SnapgridError::IoError(e)),
            });
        }
    }

    /// Every response that has arrived so far
    pub fn drain(&self) -> Vec<FetchResponse> {
        self.rx.try_iter().collect()
    }

    /// Wait up to `timeout` for the next response
    pub fn recv_timeout(&self, timeout: Duration) -> Option<FetchResponse> {
        match self.rx.recv_timeout(timeout) {
            Ok(response) => Some(response),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photo::Photo;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoSource;

    impl PhotoSource for EchoSource {
        fn search(&self, query: &str, page: u32) -> Result<SearchPage> {
            if query == "fail" {
                return Err(SnapgridError::from_status(503, "unavailable"));
            }
            Ok(SearchPage {
                results: vec![Photo::new(format!("{}-{}", query, page), "https://img/x")],
                total_pages: 5,
                total: None,
            })
        }
    }

    fn request(generation: u64, query: &str, page: u32) -> FetchRequest {
        FetchRequest {
            generation,
            query: query.to_string(),
            page,
        }
    }

    #[test]
    fn responses_carry_their_request_back() {
        let worker = FetchWorker::new(Arc::new(EchoSource));
        worker.dispatch(request(7, "cats", 2));

        let response = worker.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(response.request, request(7, "cats", 2));
        let page = response.result.unwrap();
        assert_eq!(page.results[0].id, "cats-2");
    }

    #[test]
    fn failures_are_delivered_not_swallowed() {
        let worker = FetchWorker::new(Arc::new(EchoSource));
        worker.dispatch(request(1, "fail", 1));
        let response = worker.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(response.result, Err(SnapgridError::Http { status: 503, .. })));
    }

    #[test]
    fn notify_runs_after_each_response() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let worker = FetchWorker::new(Arc::new(EchoSource)).with_notify(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        worker.dispatch(request(1, "a", 1));
        worker.dispatch(request(2, "b", 1));
        assert!(worker.recv_timeout(Duration::from_secs(5)).is_some());
        assert!(worker.recv_timeout(Duration::from_secs(5)).is_some());

        // notify runs just after the send; give the threads a moment to finish
        for _ in 0..100 {
            if count.load(Ordering::SeqCst) == 2 {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(worker.drain().is_empty());
    }
}
