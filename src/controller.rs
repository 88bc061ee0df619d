//! The search controller: single authority over what the widget shows.
//!
//! Network calls run on spawned tasks and report back through the widget
//! event channel. Every completion is tagged with the id of its request and
//! only the most recently issued request of each class (find, suggest) is
//! allowed to render. Superseded requests are not aborted; their answers are
//! dropped when they arrive.

use crate::api::{ApiError, Backend};
use crate::config::Config;
use crate::event::WidgetEvent;
use crate::labels;
use crate::model::{
    ControllerState, PageMetadata, Query, RequestId, RequestSequence, ResultPage, SearchRequest,
    SuggestionSet,
};
use crate::render::{Notice, ResultRenderer, SlotId, SuggestionService};
use crate::tracker::{ActivityKind, Tracker};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Settings of a controller instance
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    /// Base URL of document links
    pub article_base_url: String,
    /// Topics shown when the suggest service fails or has nothing to offer
    pub fallback_topics: Vec<String>,
}

impl ControllerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            article_base_url: config.article_base_url.clone(),
            fallback_topics: config.fallback_topics.clone(),
        }
    }
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

pub struct SearchController {
    backend: Arc<dyn Backend>,
    tracker: Tracker,
    events: mpsc::UnboundedSender<WidgetEvent>,
    state: ControllerState,
    query: Query,
    sequence: RequestSequence,
    /// Authoritative find request, if one is in flight
    pending_find: Option<SearchRequest>,
    /// Authoritative suggest request, if one is in flight
    pending_suggest: Option<RequestId>,
    /// Find request whose failure is currently shown
    failed_find: Option<SearchRequest>,
    /// Documents rendered so far for the current query
    shown: usize,
    results: ResultRenderer,
    suggestions: SuggestionService,
    fallback_topics: Vec<String>,
}

impl SearchController {
    /// Create a controller in `Idle`.
    ///
    /// Returns the receiving end of the widget event channel; the host feeds
    /// everything it receives there back into [`SearchController::handle_event`].
    pub fn new(
        backend: Arc<dyn Backend>,
        tracker: Tracker,
        options: ControllerOptions,
    ) -> (Self, mpsc::UnboundedReceiver<WidgetEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let controller = Self {
            backend,
            tracker,
            events,
            state: ControllerState::Idle,
            query: Query::default(),
            sequence: RequestSequence::new(),
            pending_find: None,
            pending_suggest: None,
            failed_find: None,
            shown: 0,
            results: ResultRenderer::new(options.article_base_url),
            suggestions: SuggestionService::new(),
            fallback_topics: options.fallback_topics,
        };
        (controller, rx)
    }

    /// Sender for posting user intents into the same channel as completions
    pub fn sender(&self) -> mpsc::UnboundedSender<WidgetEvent> {
        self.events.clone()
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn results(&self) -> &ResultRenderer {
        &self.results
    }

    pub fn suggestions(&self) -> &SuggestionService {
        &self.suggestions
    }

    /// Id of the find request whose answer would currently be rendered
    pub fn authoritative_find(&self) -> Option<RequestId> {
        self.pending_find.as_ref().map(|r| r.request_id)
    }

    /// Id of the suggest request whose answer would currently be rendered
    pub fn authoritative_suggest(&self) -> Option<RequestId> {
        self.pending_suggest
    }

    /// Whether a retry affordance is shown
    pub fn can_retry(&self) -> bool {
        self.failed_find.is_some()
    }

    /// Dispatch one widget event
    pub fn handle_event(&mut self, event: WidgetEvent) {
        match event {
            WidgetEvent::Submit(raw) => self.submit(&raw),
            WidgetEvent::LoadMore => self.load_more(),
            WidgetEvent::Retry => self.retry(),
            WidgetEvent::BadgeClick(topic) => self.on_badge_click(&topic),
            WidgetEvent::ResultClick(slot) => {
                self.on_result_click(slot);
            }
            WidgetEvent::CategoryBreadcrumbClick(parts) => self.on_category_breadcrumb_click(&parts),
            WidgetEvent::FindCompleted {
                request_id,
                outcome,
            } => self.on_find_result(request_id, outcome),
            WidgetEvent::SuggestCompleted {
                request_id,
                outcome,
            } => self.on_suggest_result(request_id, outcome),
            WidgetEvent::MetadataCompleted { slot, outcome } => {
                self.on_metadata_result(slot, outcome)
            }
            WidgetEvent::AutocompleteCompleted { .. } => {
                tracing::trace!("autocomplete completion ignored by search controller");
            }
        }
    }

    /// Show the opening suggestions when the widget loads.
    ///
    /// Unlike an empty [`SearchController::submit`] nothing is reported, as
    /// the user has not done anything yet.
    pub fn mount(&mut self) {
        self.reset();
        self.query = Query::default();
        self.state = ControllerState::AwaitingSuggestions;
        self.issue_suggest();
    }

    /// Commit a new query. No de-duplication: the same query is issued again.
    pub fn submit(&mut self, raw: &str) {
        let query = Query::normalize(raw);

        self.reset();
        self.tracker.report(ActivityKind::Search, query.as_str(), "");
        self.query = query;

        if self.query.is_empty() {
            self.state = ControllerState::AwaitingSuggestions;
            self.issue_suggest();
        } else {
            self.state = ControllerState::AwaitingResults;
            self.results.show_notice(Notice::PleaseWait);
            self.results.set_breadcrumb(vec![
                labels::CATEGORY.to_string(),
                self.query.to_string(),
            ]);
            self.issue_find(0);
        }
    }

    /// Fetch the next page. Only valid from `ResultsShown` with more results.
    pub fn load_more(&mut self) {
        if self.state != ControllerState::ResultsShown || !self.results.has_load_more() {
            tracing::debug!(state = %self.state, "load more ignored");
            return;
        }

        self.failed_find = None;
        self.results.clear_notice();
        self.results.set_load_more(false);
        self.state = ControllerState::LoadingMore;
        self.issue_find(self.shown);
    }

    /// Re-issue the find request whose failure is shown
    pub fn retry(&mut self) {
        let Some(failed) = self.failed_find.take() else {
            tracing::debug!(state = %self.state, "nothing to retry");
            return;
        };

        self.results.clear_notice();
        if failed.is_load_more() {
            self.results.set_load_more(false);
            self.state = ControllerState::LoadingMore;
        } else {
            self.results.show_notice(Notice::PleaseWait);
            self.state = ControllerState::AwaitingResults;
        }
        self.issue_find(failed.offset);
    }

    pub fn on_find_result(&mut self, request_id: RequestId, outcome: Result<ResultPage, ApiError>) {
        let is_current = self
            .pending_find
            .as_ref()
            .is_some_and(|r| r.request_id == request_id);
        if !is_current {
            tracing::debug!(request_id = %request_id, "discarding stale find response");
            return;
        }
        let Some(request) = self.pending_find.take() else {
            return;
        };

        let page = match outcome {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(
                    request_id = %request_id,
                    query = %request.query,
                    error = %e,
                    "find request failed"
                );
                self.results.show_notice(Notice::FindFailed);
                if request.is_load_more() {
                    self.results.set_load_more(true);
                    self.state = ControllerState::ResultsShown;
                } else {
                    self.state = ControllerState::Idle;
                }
                self.failed_find = Some(request);
                return;
            }
        };

        if page.documents.is_empty() && !request.is_load_more() {
            tracing::debug!(query = %request.query, "no results, offering suggestions");
            self.results.show_notice(Notice::NoResults);
            self.state = ControllerState::AwaitingSuggestions;
            self.issue_suggest();
            return;
        }

        let lookups = self.results.render_page(&page, request.is_load_more());
        self.shown = request.offset + page.received();
        self.state = ControllerState::ResultsShown;

        tracing::debug!(
            request_id = %request_id,
            rendered = self.results.len(),
            more = page.has_more,
            "results rendered"
        );

        for lookup in lookups {
            let backend = self.backend.clone();
            self.spawn(async move {
                let outcome = backend.metadata(&lookup.page_id).await;
                WidgetEvent::MetadataCompleted {
                    slot: lookup.slot,
                    outcome,
                }
            });
        }
    }

    pub fn on_suggest_result(
        &mut self,
        request_id: RequestId,
        outcome: Result<SuggestionSet, ApiError>,
    ) {
        if self.pending_suggest != Some(request_id) {
            tracing::debug!(request_id = %request_id, "discarding stale suggest response");
            return;
        }
        self.pending_suggest = None;

        let suggestions = match outcome {
            Ok(set) if !set.topics.is_empty() => set,
            Ok(_) => {
                tracing::debug!("suggest returned no topics, using fallback");
                SuggestionSet::new(self.fallback_topics.iter().cloned())
            }
            Err(e) => {
                tracing::warn!(error = %e, "suggest request failed, using fallback");
                SuggestionSet::new(self.fallback_topics.iter().cloned())
            }
        };

        self.suggestions.render(&suggestions);
    }

    pub fn on_metadata_result(&mut self, slot: SlotId, outcome: Result<PageMetadata, ApiError>) {
        let metadata = match outcome {
            Ok(meta) => Some(meta),
            Err(e) => {
                tracing::warn!(slot = ?slot, error = %e, "metadata lookup failed");
                None
            }
        };

        if !self.results.fill_metadata(slot, metadata) {
            tracing::trace!(slot = ?slot, "metadata for an entry that is gone");
        }
    }

    pub fn on_badge_click(&mut self, topic: &str) {
        self.submit(topic);
    }

    /// Report a click on a rendered result. Returns the link that was opened.
    pub fn on_result_click(&mut self, slot: SlotId) -> Option<String> {
        let entry = self.results.entry(slot)?;
        let title = if entry.title.is_empty() {
            entry.page_id.as_str()
        } else {
            entry.title.as_str()
        };
        self.tracker
            .report(ActivityKind::Link, title, entry.link.as_str());
        Some(entry.link.clone())
    }

    /// Report a click on a breadcrumb. Blank crumbs are left out of the label.
    pub fn on_category_breadcrumb_click(&mut self, parts: &[String]) {
        let label = parts
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(labels::CRUMB_SEPARATOR);
        self.tracker.report(ActivityKind::Category, label, "");
    }

    /// Drop everything shown and every authoritative request
    fn reset(&mut self) {
        self.results.clear();
        self.suggestions.clear();
        self.failed_find = None;
        self.pending_find = None;
        self.pending_suggest = None;
        self.shown = 0;
    }

    fn issue_find(&mut self, offset: usize) {
        let request = SearchRequest {
            query: self.query.clone(),
            request_id: self.sequence.next_id(),
            offset,
        };
        tracing::debug!(
            request_id = %request.request_id,
            query = %request.query,
            offset,
            "issuing find request"
        );
        self.pending_find = Some(request.clone());

        let backend = self.backend.clone();
        self.spawn(async move {
            let outcome = backend.find(&request.query, request.offset).await;
            WidgetEvent::FindCompleted {
                request_id: request.request_id,
                outcome,
            }
        });
    }

    fn issue_suggest(&mut self) {
        let request_id = self.sequence.next_id();
        tracing::debug!(request_id = %request_id, "issuing suggest request");
        self.pending_suggest = Some(request_id);

        let backend = self.backend.clone();
        self.spawn(async move {
            let outcome = backend.suggest().await;
            WidgetEvent::SuggestCompleted {
                request_id,
                outcome,
            }
        });
    }

    /// Run `task` in the background and post its event when done
    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = WidgetEvent> + Send + 'static,
    {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::error!("no async runtime, request dropped");
            return;
        };

        let events = self.events.clone();
        handle.spawn(async move {
            // Receiver gone means the widget was torn down.
            let _ = events.send(task.await);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Document, ProblemTag};
    use crate::tracker::{Activity, ActivitySink};
    use std::sync::Mutex;

    /// Backend whose calls never complete; tests inject completions by hand
    struct SilentBackend;

    #[async_trait::async_trait]
    impl Backend for SilentBackend {
        async fn find(&self, _query: &Query, _offset: usize) -> Result<ResultPage, ApiError> {
            std::future::pending().await
        }

        async fn suggest(&self) -> Result<SuggestionSet, ApiError> {
            std::future::pending().await
        }

        async fn autocomplete(&self, _prefix: &str) -> Result<Vec<String>, ApiError> {
            std::future::pending().await
        }

        async fn metadata(&self, _page_id: &str) -> Result<PageMetadata, ApiError> {
            std::future::pending().await
        }
    }

    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<Activity>>);

    #[async_trait::async_trait]
    impl ActivitySink for RecordingSink {
        async fn send(&self, activity: &Activity) -> Result<(), ApiError> {
            self.0.lock().unwrap().push(activity.clone());
            Ok(())
        }
    }

    fn controller() -> SearchController {
        controller_with_sink(Arc::new(RecordingSink::default()))
    }

    fn controller_with_sink(sink: Arc<RecordingSink>) -> SearchController {
        let (controller, _rx) = SearchController::new(
            Arc::new(SilentBackend),
            Tracker::new(sink),
            ControllerOptions::default(),
        );
        controller
    }

    fn page(ids: &[&str], has_more: bool) -> ResultPage {
        ResultPage {
            documents: ids
                .iter()
                .map(|id| Document::new(*id, [ProblemTag::Veraltet]))
                .collect(),
            has_more,
            skipped: 0,
        }
    }

    fn page_ids(controller: &SearchController) -> Vec<String> {
        controller
            .results()
            .entries()
            .iter()
            .map(|e| e.page_id.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_submit_enters_awaiting_results_with_placeholder() {
        let mut c = controller();
        c.submit("  Katzen ");
        assert_eq!(c.state(), ControllerState::AwaitingResults);
        assert_eq!(c.query().as_str(), "katzen");
        assert_eq!(c.results().notice(), Some(Notice::PleaseWait));
        assert!(c.authoritative_find().is_some());
        assert!(c.authoritative_suggest().is_none());
    }

    #[tokio::test]
    async fn test_empty_submit_only_suggests() {
        let mut c = controller();
        c.submit("   ");
        assert_eq!(c.state(), ControllerState::AwaitingSuggestions);
        assert!(c.authoritative_find().is_none());
        assert!(c.authoritative_suggest().is_some());
        assert_eq!(c.results().notice(), None);
    }

    #[tokio::test]
    async fn test_mount_suggests_without_reporting() {
        let sink = Arc::new(RecordingSink::default());
        let mut c = controller_with_sink(sink.clone());
        c.mount();

        assert_eq!(c.state(), ControllerState::AwaitingSuggestions);
        assert!(c.authoritative_suggest().is_some());
        assert!(c.authoritative_find().is_none());

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(sink.0.lock().unwrap().is_empty());

        c.submit("");
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert_eq!(sink.0.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_stale_find_is_discarded() {
        let mut c = controller();
        c.submit("hunde");
        let first = c.authoritative_find().unwrap();
        c.submit("katzen");
        let second = c.authoritative_find().unwrap();
        assert!(second > first);

        c.on_find_result(second, Ok(page(&["Katze"], false)));
        c.on_find_result(first, Ok(page(&["Hund"], false)));

        assert_eq!(page_ids(&c), vec!["Katze"]);
        assert_eq!(c.state(), ControllerState::ResultsShown);
    }

    #[tokio::test]
    async fn test_stale_find_arriving_first_does_not_render() {
        let mut c = controller();
        c.submit("hunde");
        let first = c.authoritative_find().unwrap();
        c.submit("katzen");

        c.on_find_result(first, Ok(page(&["Hund"], false)));
        assert!(c.results().is_empty());
        assert_eq!(c.results().notice(), Some(Notice::PleaseWait));
        assert_eq!(c.state(), ControllerState::AwaitingResults);
    }

    #[tokio::test]
    async fn test_find_response_after_empty_submit_is_stale() {
        let mut c = controller();
        c.submit("hunde");
        let find = c.authoritative_find().unwrap();
        c.submit("");

        c.on_find_result(find, Ok(page(&["Hund"], false)));
        assert!(c.results().is_empty());
        assert_eq!(c.state(), ControllerState::AwaitingSuggestions);
    }

    #[tokio::test]
    async fn test_empty_result_shows_message_and_suggests() {
        let mut c = controller();
        c.submit("xyz");
        let find = c.authoritative_find().unwrap();
        c.on_find_result(find, Ok(ResultPage::default()));

        assert_eq!(c.results().notice(), Some(Notice::NoResults));
        assert_eq!(c.state(), ControllerState::AwaitingSuggestions);
        let suggest = c.authoritative_suggest().unwrap();
        assert!(suggest > find);

        c.on_suggest_result(suggest, Ok(SuggestionSet::new(["Biologie", "Geschichte"])));
        assert_eq!(
            c.suggestions().current().unwrap().text(),
            "Wie wäre es mit Biologie oder Geschichte?"
        );
        assert_eq!(c.results().notice(), Some(Notice::NoResults));
        assert_eq!(c.state(), ControllerState::AwaitingSuggestions);
    }

    #[tokio::test]
    async fn test_stale_suggest_is_discarded() {
        let mut c = controller();
        c.submit("");
        let first = c.authoritative_suggest().unwrap();
        c.submit("");
        let second = c.authoritative_suggest().unwrap();

        c.on_suggest_result(first, Ok(SuggestionSet::new(["Alt"])));
        assert!(c.suggestions().current().is_none());

        c.on_suggest_result(second, Ok(SuggestionSet::new(["Neu"])));
        assert_eq!(c.suggestions().current().unwrap().topics(), ["Neu".to_string()]);
    }

    #[tokio::test]
    async fn test_suggest_failure_uses_fallback_topics() {
        let mut c = controller();
        c.submit("");
        let id = c.authoritative_suggest().unwrap();
        c.on_suggest_result(id, Err(ApiError::Status { status: 500, body: String::new() }));
        assert_eq!(
            c.suggestions().current().unwrap().text(),
            "Wie wäre es mit China, 19. Jahrhundert oder Fußball?"
        );
    }

    #[tokio::test]
    async fn test_load_more_appends() {
        let mut c = controller();
        c.submit("katzen");
        let first = c.authoritative_find().unwrap();
        c.on_find_result(first, Ok(page(&["Katze", "Kater"], true)));
        assert!(c.results().has_load_more());

        c.load_more();
        assert_eq!(c.state(), ControllerState::LoadingMore);
        let second = c.authoritative_find().unwrap();
        assert!(second > first);

        c.on_find_result(second, Ok(page(&["Luchs"], false)));
        assert_eq!(page_ids(&c), vec!["Katze", "Kater", "Luchs"]);
        assert_eq!(c.state(), ControllerState::ResultsShown);
        assert!(!c.results().has_load_more());
    }

    #[tokio::test]
    async fn test_load_more_without_more_is_noop() {
        let mut c = controller();
        c.submit("katzen");
        let id = c.authoritative_find().unwrap();
        c.on_find_result(id, Ok(page(&["Katze"], false)));

        c.load_more();
        assert_eq!(c.state(), ControllerState::ResultsShown);
        assert!(c.authoritative_find().is_none());
    }

    #[tokio::test]
    async fn test_load_more_while_in_flight_is_ignored() {
        let mut c = controller();
        c.submit("katzen");
        let id = c.authoritative_find().unwrap();
        c.load_more();
        assert_eq!(c.authoritative_find(), Some(id));
        assert_eq!(c.state(), ControllerState::AwaitingResults);
    }

    #[tokio::test]
    async fn test_empty_load_more_page_keeps_list() {
        let mut c = controller();
        c.submit("katzen");
        let id = c.authoritative_find().unwrap();
        c.on_find_result(id, Ok(page(&["Katze"], true)));
        c.load_more();
        let more = c.authoritative_find().unwrap();
        c.on_find_result(more, Ok(ResultPage::default()));

        assert_eq!(page_ids(&c), vec!["Katze"]);
        assert_eq!(c.results().notice(), None);
        assert_eq!(c.state(), ControllerState::ResultsShown);
        assert!(c.authoritative_suggest().is_none());
    }

    #[tokio::test]
    async fn test_find_failure_offers_retry() {
        let mut c = controller();
        c.submit("katzen");
        let id = c.authoritative_find().unwrap();
        c.on_find_result(id, Err(ApiError::Status { status: 502, body: String::new() }));

        assert_eq!(c.results().notice(), Some(Notice::FindFailed));
        assert_eq!(c.state(), ControllerState::Idle);
        assert!(c.can_retry());

        c.retry();
        assert_eq!(c.state(), ControllerState::AwaitingResults);
        assert_eq!(c.results().notice(), Some(Notice::PleaseWait));
        assert!(c.authoritative_find().unwrap() > id);
        assert!(!c.can_retry());
    }

    #[tokio::test]
    async fn test_load_more_failure_keeps_list() {
        let mut c = controller();
        c.submit("katzen");
        let id = c.authoritative_find().unwrap();
        c.on_find_result(id, Ok(page(&["Katze"], true)));
        c.load_more();
        let more = c.authoritative_find().unwrap();
        c.on_find_result(more, Err(ApiError::Status { status: 500, body: String::new() }));

        assert_eq!(page_ids(&c), vec!["Katze"]);
        assert_eq!(c.state(), ControllerState::ResultsShown);
        assert!(c.results().has_load_more());

        c.retry();
        assert_eq!(c.state(), ControllerState::LoadingMore);
        let retried = c.authoritative_find().unwrap();
        c.on_find_result(retried, Ok(page(&["Luchs"], false)));
        assert_eq!(page_ids(&c), vec!["Katze", "Luchs"]);
    }

    #[tokio::test]
    async fn test_retry_without_failure_is_noop() {
        let mut c = controller();
        c.retry();
        assert_eq!(c.state(), ControllerState::Idle);
        assert!(c.authoritative_find().is_none());
    }

    #[tokio::test]
    async fn test_badge_click_submits_topic() {
        let mut c = controller();
        c.submit("");
        c.on_badge_click("Biologie");
        assert_eq!(c.query().as_str(), "biologie");
        assert_eq!(c.state(), ControllerState::AwaitingResults);
        assert!(c.suggestions().current().is_none());
    }

    #[tokio::test]
    async fn test_result_click_returns_link_without_state_change() {
        let mut c = controller();
        c.submit("katzen");
        let id = c.authoritative_find().unwrap();
        c.on_find_result(id, Ok(page(&["Katze"], false)));
        let slot = c.results().entries()[0].slot;

        let link = c.on_result_click(slot);
        assert_eq!(link.as_deref(), Some("https://de.wikipedia.org/wiki/Katze"));
        assert_eq!(c.state(), ControllerState::ResultsShown);
    }
}
