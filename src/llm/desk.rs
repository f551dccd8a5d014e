//! Single-flight strategy generation for one session
//!
//! A generation call can take several seconds. Only the newest request per
//! session matters, so submitting a new one aborts whatever is still in
//! flight; the stale caller gets `Superseded`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::AbortHandle;

use crate::core::error::{MatchupError, Result};
use crate::core::types::RequestId;
use crate::llm::client::NarrativeGenerator;
use crate::llm::narrative::Narrative;
use crate::prompt::StrategyRequest;

/// Owns the generator and the handle of the in-flight request
pub struct StrategyDesk<G> {
    generator: Arc<G>,
    inflight: Mutex<Option<(RequestId, AbortHandle)>>,
}

impl<G> StrategyDesk<G>
where
    G: NarrativeGenerator + 'static,
{
    pub fn new(generator: G) -> Self {
        Self {
            generator: Arc::new(generator),
            inflight: Mutex::new(None),
        }
    }

    /// Compose `request`, send it, and parse the reply
    ///
    /// Must be called from within a tokio runtime.
    pub async fn generate(&self, request: &StrategyRequest) -> Result<Narrative> {
        let id = RequestId::new();
        let prompt = request.prompt();
        tracing::info!(
            request = %id,
            opponent = request.opponent().len(),
            own = request.own().len(),
            prompt_len = prompt.len(),
            "requesting strategy"
        );

        let generator = Arc::clone(&self.generator);
        let handle = tokio::spawn(async move { generator.generate(&prompt).await });

        if let Some((stale, abort)) = self.slot().replace((id, handle.abort_handle())) {
            tracing::info!(request = %stale, superseded_by = %id, "superseding in-flight request");
            abort.abort();
        }

        // Clears the slot however this future ends, including being dropped
        let _guard = InflightGuard { desk: self, id };
        let outcome = handle.await;

        let text = match outcome {
            Ok(result) => result?,
            Err(e) if e.is_cancelled() => {
                tracing::debug!(request = %id, "request was superseded");
                return Err(MatchupError::Superseded);
            }
            Err(e) => return Err(MatchupError::Generation(format!("generation task failed: {}", e))),
        };

        if text.trim().is_empty() {
            return Err(MatchupError::MalformedResponse("empty narrative".into()));
        }
        tracing::info!(request = %id, len = text.len(), "strategy received");
        Ok(Narrative::parse(&text))
    }

    /// Whether a request is currently outstanding
    pub fn has_inflight(&self) -> bool {
        self.slot().is_some()
    }

    /// Abort the outstanding request, if any. Returns whether one was aborted.
    pub fn cancel(&self) -> bool {
        match self.slot().take() {
            Some((id, abort)) => {
                tracing::info!(request = %id, "cancelling in-flight request");
                abort.abort();
                true
            }
            None => false,
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<(RequestId, AbortHandle)>> {
        self.inflight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases the in-flight slot of one request when it goes out of scope.
/// A request abandoned by its caller is aborted.
struct InflightGuard<'a, G> {
    desk: &'a StrategyDesk<G>,
    id: RequestId,
}

impl<G> Drop for InflightGuard<'_, G> {
    fn drop(&mut self) {
        let mut slot = self.desk.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|(current, _)| *current == self.id) {
            if let Some((_, abort)) = slot.take() {
                abort.abort();
            }
        }
    }
}
