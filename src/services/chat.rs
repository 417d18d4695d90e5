use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::providers::{ChatBackend, ChatRequest};

/// Front door for the chat backend. Failures never escape: they are recorded
/// in `last_error` and the caller gets `None`. A blank reply counts as a
/// failure.
///
/// Concurrent calls are neither merged nor queued; the caller disables the
/// composer while a request is outstanding.
#[derive(Clone)]
pub struct ChatClient {
    backend: Arc<dyn ChatBackend>,
    in_flight: Arc<AtomicUsize>,
    last_error: Arc<Mutex<Option<String>>>,
}

/// Counts one outstanding request until dropped.
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ChatClient {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            in_flight: Arc::new(AtomicUsize::new(0)),
            last_error: Arc::new(Mutex::new(None)),
        }
    }

    /// `loading()` is true from the moment this is called, before the
    /// returned future is first polled.
    pub fn send_user_text(
        &self,
        text: &str,
    ) -> impl Future<Output = Option<String>> + Send + 'static {
        let in_flight = InFlight::enter(&self.in_flight);
        *self.last_error.lock().unwrap() = None;

        let backend = self.backend.clone();
        let last_error = self.last_error.clone();
        let request = ChatRequest {
            message: text.to_string(),
        };

        async move {
            let result = backend.send_message(request).await;
            drop(in_flight);

            let error = match result {
                Ok(reply) if !reply.reply.trim().is_empty() => return Some(reply.reply),
                Ok(_) => "Empty reply".to_string(),
                Err(e) => e.to_string(),
            };
            tracing::error!("Chat API error: {}", error);
            *last_error.lock().unwrap() = Some(error);
            None
        }
    }

    pub fn loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }
}
