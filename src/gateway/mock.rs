use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{CompletionRequest, CompletionResult, Completer};
use crate::error::GatewayError;

type Responder = Box<dyn Fn(&CompletionRequest) -> CompletionResult + Send + Sync>;

/// A test double for [`Completer`]. Records every request it sees and
/// answers from a closure.
pub struct MockCompleter {
    respond: Responder,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockCompleter {
    /// Answer every request with the given closure.
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&CompletionRequest) -> CompletionResult + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always succeed with `text`.
    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    /// Return pre-defined results in order. Running out is reported as a
    /// transport error so a test sees it instead of hanging.
    pub fn scripted(results: Vec<CompletionResult>) -> Self {
        let index = AtomicUsize::new(0);
        Self::new(move |_| {
            let i = index.fetch_add(1, Ordering::SeqCst);
            results.get(i).cloned().unwrap_or_else(|| {
                Err(GatewayError::Transport {
                    message: format!("MockCompleter: no more results (called {} times)", i + 1),
                    timed_out: false,
                })
            })
        })
    }

    /// Number of completion calls made so far.
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Copies of every request received, in arrival order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Completer for MockCompleter {
    async fn complete(&self, request: &CompletionRequest) -> CompletionResult {
        self.requests.lock().unwrap().push(request.clone());
        (self.respond)(request)
    }
}
