use crate::api::ApiError;
use crate::model::{PageMetadata, RequestId, ResultPage, SuggestionSet};
use crate::render::SlotId;
use crossterm::event::KeyEvent;

/// Everything the widget reacts to: user intents and network completions.
///
/// Completions carry the id of the request (or the render slot) they belong
/// to, so the receiver can tell current answers from stale ones.
#[derive(Debug)]
pub enum WidgetEvent {
    /// Query committed by the user
    Submit(String),
    LoadMore,
    /// Re-issue the search that failed
    Retry,
    /// Suggested topic clicked
    BadgeClick(String),
    /// Result link clicked
    ResultClick(SlotId),
    /// Breadcrumb clicked; carries the crumbs up to and including the clicked one
    CategoryBreadcrumbClick(Vec<String>),
    FindCompleted {
        request_id: RequestId,
        outcome: Result<ResultPage, ApiError>,
    },
    SuggestCompleted {
        request_id: RequestId,
        outcome: Result<SuggestionSet, ApiError>,
    },
    MetadataCompleted {
        slot: SlotId,
        outcome: Result<PageMetadata, ApiError>,
    },
    AutocompleteCompleted {
        request_id: RequestId,
        outcome: Result<Vec<String>, ApiError>,
    },
}

/// Events of the terminal host
#[derive(Debug)]
pub enum Event {
    /// Terminal key press event
    Key(KeyEvent),
    /// Terminal resize event
    Resize(u16, u16),
    /// Tick event for periodic redraws
    Tick,
    /// Widget event delivered through the completion channel
    Widget(WidgetEvent),
}

/// Result type for event handling
pub type EventResult<T> = anyhow::Result<T>;
