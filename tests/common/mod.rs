//! Common test utilities: a scripted backend, a recording activity sink and
//! an event pump that drives a controller until it goes quiet.

#![allow(dead_code)]

use mitmachen::api::{ApiError, Backend};
use mitmachen::event::WidgetEvent;
use mitmachen::model::{Document, PageMetadata, ProblemTag, Query, ResultPage, SuggestionSet};
use mitmachen::tracker::{Activity, ActivitySink, Tracker};
use mitmachen::{ControllerOptions, SearchController};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, Notify};

#[derive(Clone)]
struct FindScript {
    /// `None` answers with an error
    page: Option<ResultPage>,
    /// When set, the answer is held back until the gate is opened
    gate: Option<Arc<Notify>>,
}

#[derive(Default)]
struct Script {
    finds: HashMap<(String, usize), FindScript>,
    suggestions: Option<SuggestionSet>,
    metadata: HashMap<String, PageMetadata>,
    calls: Vec<String>,
}

/// Backend answering from a script, with optional gates to control the
/// order in which find answers arrive
#[derive(Default)]
pub struct ScriptedBackend {
    script: Mutex<Script>,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on_find(&self, query: &str, offset: usize, page: ResultPage) {
        self.script.lock().unwrap().finds.insert(
            (query.to_string(), offset),
            FindScript {
                page: Some(page),
                gate: None,
            },
        );
    }

    /// Like `on_find`, but the answer waits until the returned gate is opened
    pub fn on_find_gated(&self, query: &str, offset: usize, page: ResultPage) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.script.lock().unwrap().finds.insert(
            (query.to_string(), offset),
            FindScript {
                page: Some(page),
                gate: Some(gate.clone()),
            },
        );
        gate
    }

    pub fn fail_find(&self, query: &str, offset: usize) {
        self.script.lock().unwrap().finds.insert(
            (query.to_string(), offset),
            FindScript {
                page: None,
                gate: None,
            },
        );
    }

    pub fn on_suggest(&self, topics: &[&str]) {
        self.script.lock().unwrap().suggestions = Some(SuggestionSet::new(topics.iter().copied()));
    }

    pub fn with_metadata(&self, page_id: &str, title: &str, description: &str) {
        self.script.lock().unwrap().metadata.insert(
            page_id.to_string(),
            PageMetadata {
                title: title.to_string(),
                description: description.to_string(),
            },
        );
    }

    /// Calls seen so far, e.g. `find:katzen:0`, `suggest`, `metadata:Katze`
    pub fn calls(&self) -> Vec<String> {
        self.script.lock().unwrap().calls.clone()
    }

    fn record(&self, call: String) {
        self.script.lock().unwrap().calls.push(call);
    }
}

fn unavailable() -> ApiError {
    ApiError::Status {
        status: 503,
        body: "unavailable".to_string(),
    }
}

#[async_trait::async_trait]
impl Backend for ScriptedBackend {
    async fn find(&self, query: &Query, offset: usize) -> Result<ResultPage, ApiError> {
        self.record(format!("find:{}:{}", query, offset));
        let script = self
            .script
            .lock()
            .unwrap()
            .finds
            .get(&(query.to_string(), offset))
            .cloned();

        let Some(script) = script else {
            return Err(unavailable());
        };
        if let Some(gate) = script.gate {
            gate.notified().await;
        }
        script.page.ok_or_else(unavailable)
    }

    async fn suggest(&self) -> Result<SuggestionSet, ApiError> {
        self.record("suggest".to_string());
        let suggestions = self.script.lock().unwrap().suggestions.clone();
        suggestions.ok_or_else(unavailable)
    }

    async fn autocomplete(&self, prefix: &str) -> Result<Vec<String>, ApiError> {
        self.record(format!("autocomplete:{prefix}"));
        Ok(Vec::new())
    }

    async fn metadata(&self, page_id: &str) -> Result<PageMetadata, ApiError> {
        self.record(format!("metadata:{page_id}"));
        let metadata = self.script.lock().unwrap().metadata.get(page_id).cloned();
        metadata.ok_or_else(unavailable)
    }
}

/// Activity sink that remembers everything it was sent
#[derive(Default)]
pub struct RecordingSink {
    activities: Mutex<Vec<Activity>>,
}

impl RecordingSink {
    pub fn activities(&self) -> Vec<Activity> {
        self.activities.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ActivitySink for RecordingSink {
    async fn send(&self, activity: &Activity) -> Result<(), ApiError> {
        self.activities.lock().unwrap().push(activity.clone());
        Ok(())
    }
}

/// A controller wired to `backend` and a recording sink
pub struct TestWidget {
    pub controller: SearchController,
    pub events: mpsc::UnboundedReceiver<WidgetEvent>,
    pub sink: Arc<RecordingSink>,
}

impl TestWidget {
    pub fn new(backend: Arc<ScriptedBackend>) -> Self {
        let sink = Arc::new(RecordingSink::default());
        let (controller, events) = SearchController::new(
            backend,
            Tracker::new(sink.clone()),
            ControllerOptions::default(),
        );
        Self {
            controller,
            events,
            sink,
        }
    }

    /// Feed completions back into the controller until none arrive for a while
    pub async fn settle(&mut self) {
        while let Ok(Some(event)) =
            tokio::time::timeout(Duration::from_millis(100), self.events.recv()).await
        {
            self.controller.handle_event(event);
        }
    }

    pub fn page_ids(&self) -> Vec<String> {
        self.controller
            .results()
            .entries()
            .iter()
            .map(|e| e.page_id.clone())
            .collect()
    }
}

/// Page of documents each flagged with `tag`
pub fn page(ids: &[&str], tag: ProblemTag, has_more: bool) -> ResultPage {
    ResultPage {
        documents: ids.iter().map(|id| Document::new(*id, [tag])).collect(),
        has_more,
        skipped: 0,
    }
}
