//! Core data model of the search widget.

use crate::labels;
use std::fmt;

/// A trimmed, lowercased topic. The empty query is a valid state ("no topic").
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Query(String);

impl Query {
    /// Normalize raw user input (trim, lowercase)
    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sequence number assigned to every issued find/suggest request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic source of [`RequestId`]s
#[derive(Debug, Default)]
pub struct RequestSequence {
    last: u64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next id; always greater than every id issued before
    pub fn next_id(&mut self) -> RequestId {
        self.last += 1;
        RequestId(self.last)
    }
}

/// A find request as issued by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: Query,
    pub request_id: RequestId,
    /// Number of documents already shown for this query
    pub offset: usize,
}

impl SearchRequest {
    /// Whether this request continues a previous page
    pub fn is_load_more(&self) -> bool {
        self.offset > 0
    }
}

/// Content-quality flag attached to a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemTag {
    Ueberarbeiten,
    Lueckenhaft,
    Veraltet,
    BelegeFehlen,
    Allgemeinverstaendlichkeit,
    DefekterWeblink,
}

impl ProblemTag {
    pub const ALL: [ProblemTag; 6] = [
        ProblemTag::Ueberarbeiten,
        ProblemTag::Lueckenhaft,
        ProblemTag::Veraltet,
        ProblemTag::BelegeFehlen,
        ProblemTag::Allgemeinverstaendlichkeit,
        ProblemTag::DefekterWeblink,
    ];

    /// Parse the backend's template name. Underscores and spaces are
    /// interchangeable; unknown names yield `None`.
    pub fn from_wire(raw: &str) -> Option<Self> {
        let name = raw.trim().replace('_', " ");
        match name.as_str() {
            "Überarbeiten" => Some(Self::Ueberarbeiten),
            "Lückenhaft" => Some(Self::Lueckenhaft),
            "Veraltet" => Some(Self::Veraltet),
            "Belege fehlen" => Some(Self::BelegeFehlen),
            "Allgemeinverständlichkeit" => Some(Self::Allgemeinverstaendlichkeit),
            "Defekter Weblink" | "Defekte Weblinks" | "Ungeprüfter Archivlink" => {
                Some(Self::DefekterWeblink)
            }
            other if other.starts_with("Wikipedia:Defekte Weblinks/") => {
                Some(Self::DefekterWeblink)
            }
            _ => None,
        }
    }

    fn text(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            Self::Ueberarbeiten => labels::UEBERARBEITEN,
            Self::Lueckenhaft => labels::LUECKENHAFT,
            Self::Veraltet => labels::VERALTET,
            Self::BelegeFehlen => labels::BELEGE_FEHLEN,
            Self::Allgemeinverstaendlichkeit => labels::ALLGEMEINVERSTAENDLICHKEIT,
            Self::DefekterWeblink => labels::DEFEKTER_WEBLINK,
        }
    }

    /// Short human label shown on the badge
    pub fn label(&self) -> &'static str {
        self.text().0
    }

    /// Long-form explanation shown as tooltip
    pub fn explanation(&self) -> &'static str {
        self.text().1
    }

    /// In-page fragment appended to the document link, possibly empty
    pub fn anchor(&self) -> &'static str {
        self.text().2
    }
}

/// An article flagged with one or more problems
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// External page key, resolved to a title/description elsewhere
    pub page_id: String,
    /// Distinct tags in first-seen order
    pub problems: Vec<ProblemTag>,
}

impl Document {
    pub fn new(page_id: impl Into<String>, problems: impl IntoIterator<Item = ProblemTag>) -> Self {
        let mut tags: Vec<ProblemTag> = Vec::new();
        for tag in problems {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        Self {
            page_id: page_id.into(),
            problems: tags,
        }
    }

    /// External link of this document below `base`
    pub fn link(&self, base: &str) -> String {
        format!("{}{}", base, self.page_id.replace(' ', "_"))
    }
}

/// One page of find results, in server order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultPage {
    pub documents: Vec<Document>,
    pub has_more: bool,
    /// Articles the server sent that could not be decoded
    pub skipped: usize,
}

impl ResultPage {
    /// Articles the server counted for this page, decoded or not.
    /// Paging continues after these.
    pub fn received(&self) -> usize {
        self.documents.len() + self.skipped
    }
}

/// Topics proposed when there is no query or no result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionSet {
    pub topics: Vec<String>,
}

impl SuggestionSet {
    pub fn new<I, S>(topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            topics: topics.into_iter().map(Into::into).collect(),
        }
    }
}

/// Title and description of a document from the metadata service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
}

/// What the widget is currently doing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ControllerState {
    #[default]
    Idle,
    AwaitingSuggestions,
    AwaitingResults,
    ResultsShown,
    LoadingMore,
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::AwaitingSuggestions => "awaiting suggestions",
            Self::AwaitingResults => "awaiting results",
            Self::ResultsShown => "results shown",
            Self::LoadingMore => "loading more",
        };
        f.write_str(name)
    }
}
