use crate::api::{ApiError, Backend};
use crate::event::WidgetEvent;
use crate::model::{RequestId, RequestSequence};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Prefix completion for the query field.
///
/// Keeps its own request sequence: only the answer to the latest prefix is
/// shown, older answers are dropped.
pub struct Autocomplete {
    backend: Arc<dyn Backend>,
    events: mpsc::UnboundedSender<WidgetEvent>,
    sequence: RequestSequence,
    min_chars: usize,
    pending: Option<(RequestId, String)>,
    candidates: Vec<String>,
}

impl Autocomplete {
    pub fn new(
        backend: Arc<dyn Backend>,
        events: mpsc::UnboundedSender<WidgetEvent>,
        min_chars: usize,
    ) -> Self {
        Self {
            backend,
            events,
            sequence: RequestSequence::new(),
            min_chars,
            pending: None,
            candidates: Vec::new(),
        }
    }

    /// Ask for candidates matching `input`; short inputs clear the list instead
    pub fn request(&mut self, input: &str) {
        let prefix = input.trim();
        if prefix.chars().count() < self.min_chars {
            self.clear();
            return;
        }
        if self.pending.as_ref().is_some_and(|(_, p)| p == prefix) {
            return;
        }

        let request_id = self.sequence.next_id();
        self.pending = Some((request_id, prefix.to_string()));

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::error!("no async runtime, autocomplete request dropped");
            return;
        };

        let backend = self.backend.clone();
        let events = self.events.clone();
        let prefix = prefix.to_string();
        handle.spawn(async move {
            let outcome = backend.autocomplete(&prefix).await;
            let _ = events.send(WidgetEvent::AutocompleteCompleted {
                request_id,
                outcome,
            });
        });
    }

    pub fn on_result(&mut self, request_id: RequestId, outcome: Result<Vec<String>, ApiError>) {
        let prefix = match &self.pending {
            Some((id, prefix)) if *id == request_id => prefix.to_lowercase(),
            _ => {
                tracing::trace!(request_id = %request_id, "discarding stale autocomplete response");
                return;
            }
        };
        self.pending = None;

        match outcome {
            Ok(candidates) => {
                self.candidates = candidates
                    .into_iter()
                    .filter(|c| c.to_lowercase().starts_with(&prefix))
                    .collect();
            }
            Err(e) => {
                tracing::warn!(error = %e, "autocomplete request failed");
                self.candidates.clear();
            }
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Best candidate, if any
    pub fn first(&self) -> Option<&str> {
        self.candidates.first().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.pending = None;
        self.candidates.clear();
    }
}
