//! Lifecycle of a generation request, from submission to the visible result.
//!
//! The controller owns all mutable state. Each [`GenerationController::submit`]
//! spawns a single task that calls the service once and posts a [`Completion`]
//! back into the controller's queue; the host loop feeds those completions to
//! [`GenerationController::apply`]. Completions are tagged with the
//! [`RequestId`] issued at submission, and only the most recent id is allowed
//! to change state, so a slow earlier response can never overwrite a newer one.

use crate::{
    error::{FlowgenError, Result},
    models::{Completion, GenerationRequest, GenerationState, RequestId, ViewState},
    save::{ImageSaver, SAVE_FILE_NAME},
    service::GenerationService,
};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct GenerationController {
    service: Arc<dyn GenerationService>,
    saver: Arc<dyn ImageSaver>,
    query: String,
    state: GenerationState,
    last_issued: u64,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

impl GenerationController {
    pub fn new(service: Arc<dyn GenerationService>, saver: Arc<dyn ImageSaver>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            service,
            saver,
            query: String::new(),
            state: GenerationState::Idle,
            last_issued: 0,
            completions_tx,
            completions_rx,
        }
    }

    /// Replaces the stored query verbatim.
    pub fn update_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, GenerationState::Pending { .. })
    }

    /// Id of the most recent submission, if any.
    pub fn latest_request(&self) -> Option<RequestId> {
        (self.last_issued > 0).then_some(RequestId(self.last_issued))
    }

    /// Starts a new generation cycle for the current query.
    ///
    /// The previous result is replaced by `Pending` before the request leaves,
    /// and exactly one service call is made. Must be called from within a
    /// tokio runtime.
    pub fn submit(&mut self) -> RequestId {
        self.last_issued += 1;
        let id = RequestId(self.last_issued);
        self.state = GenerationState::Pending { request: id };

        let request = GenerationRequest {
            id,
            query: self.query.clone(),
        };
        let service = Arc::clone(&self.service);
        let completions = self.completions_tx.clone();

        tokio::spawn(async move {
            let outcome = AssertUnwindSafe(service.generate(&request))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    Err(FlowgenError::Internal("generation call panicked".into()))
                });

            if completions.send(Completion { request, outcome }).is_err() {
                log::debug!("Controller dropped before a request completed");
            }
        });

        log::debug!("Submitted request {}", id);
        id
    }

    /// Applies a completion if it belongs to the most recent submission.
    /// Returns false when the completion was stale and discarded.
    pub fn apply(&mut self, completion: Completion) -> bool {
        let Completion { request, outcome } = completion;

        if request.id != RequestId(self.last_issued) {
            log::debug!(
                "Discarding stale response for request {} (latest is #{})",
                request.id,
                self.last_issued
            );
            return false;
        }

        self.state = match outcome {
            Ok(image) => {
                log::info!("Request {} produced {}", request.id, image);
                GenerationState::Succeeded(image)
            }
            Err(e) => {
                if e.is_rejection() {
                    log::warn!("Request {} rejected: {}", request.id, e);
                } else {
                    log::error!("Request {} failed: {}", request.id, e);
                }
                GenerationState::Failed(e.user_message())
            }
        };
        true
    }

    /// Waits for the next completion posted by a submission task.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        self.completions_rx.recv().await
    }

    /// Waits for the next completion and applies it.
    pub async fn resolve_next(&mut self) -> bool {
        match self.next_completion().await {
            Some(completion) => self.apply(completion),
            None => false,
        }
    }

    /// Applies every completion already queued without waiting. Returns how
    /// many of them changed state.
    pub fn drain_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            if self.apply(completion) {
                applied += 1;
            }
        }
        applied
    }

    pub fn current_view_state(&self) -> ViewState {
        ViewState::from(&self.state)
    }

    /// Saves the displayed image as `flowchart.png`. Does nothing and returns
    /// `Ok(None)` unless an image is currently shown.
    pub async fn save_current_image(&self) -> Result<Option<PathBuf>> {
        let image = match &self.state {
            GenerationState::Succeeded(image) => image,
            _ => {
                log::debug!("Save requested with no image on screen");
                return Ok(None);
            }
        };

        self.saver.save(image, SAVE_FILE_NAME).await.map(Some)
    }
}
