use crate::labels;
use crate::model::{Document, PageMetadata, ProblemTag, ResultPage};
use std::collections::HashMap;

/// Stable handle of one rendered entry.
///
/// Slots are never reused, so a metadata answer for an entry that has since
/// been cleared cannot land in a newer entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(u64);

/// Status row shown instead of (or above) the entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    PleaseWait,
    NoResults,
    /// Carries a retry affordance
    FindFailed,
}

impl Notice {
    pub fn text(&self) -> &'static str {
        match self {
            Self::PleaseWait => labels::PLEASE_WAIT,
            Self::NoResults => labels::NO_RESULTS,
            Self::FindFailed => labels::FIND_FAILED,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::FindFailed)
    }
}

/// One problem badge of an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemBadge {
    pub tag: ProblemTag,
    pub label: &'static str,
    /// Tooltip text
    pub explanation: &'static str,
    /// Document link plus the tag's anchor
    pub href: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataState {
    Pending,
    Loaded,
    /// Lookup failed; the entry keeps a blank title
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    pub slot: SlotId,
    pub page_id: String,
    pub link: String,
    pub title: String,
    pub description: String,
    pub metadata: MetadataState,
    pub badges: Vec<ProblemBadge>,
}

/// Metadata lookup the host has to run for a freshly rendered entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataLookup {
    pub slot: SlotId,
    pub page_id: String,
}

/// Renders result pages into a list of entries.
///
/// Entries are painted immediately with their badges; titles arrive later
/// through [`ResultRenderer::fill_metadata`], one slot at a time.
#[derive(Debug)]
pub struct ResultRenderer {
    article_base_url: String,
    entries: Vec<ResultEntry>,
    slots: HashMap<SlotId, usize>,
    next_slot: u64,
    notice: Option<Notice>,
    load_more: bool,
    breadcrumb: Vec<String>,
}

impl ResultRenderer {
    pub fn new(article_base_url: impl Into<String>) -> Self {
        Self {
            article_base_url: article_base_url.into(),
            entries: Vec::new(),
            slots: HashMap::new(),
            next_slot: 0,
            notice: None,
            load_more: false,
            breadcrumb: Vec::new(),
        }
    }

    /// Remove entries, notice, load-more affordance and breadcrumb
    pub fn clear(&mut self) {
        self.entries.clear();
        self.slots.clear();
        self.notice = None;
        self.load_more = false;
        self.breadcrumb.clear();
    }

    pub fn show_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn set_load_more(&mut self, visible: bool) {
        self.load_more = visible;
    }

    pub fn set_breadcrumb(&mut self, parts: Vec<String>) {
        self.breadcrumb = parts;
    }

    /// Render `page`, replacing the list or appending to it.
    ///
    /// Returns one metadata lookup per new entry.
    pub fn render_page(&mut self, page: &ResultPage, append: bool) -> Vec<MetadataLookup> {
        if !append {
            self.entries.clear();
            self.slots.clear();
        }
        self.notice = None;

        let mut lookups = Vec::with_capacity(page.documents.len());
        for document in &page.documents {
            let entry = self.build_entry(document);
            lookups.push(MetadataLookup {
                slot: entry.slot,
                page_id: entry.page_id.clone(),
            });
            self.slots.insert(entry.slot, self.entries.len());
            self.entries.push(entry);
        }

        self.load_more = page.has_more;
        lookups
    }

    fn build_entry(&mut self, document: &Document) -> ResultEntry {
        let slot = SlotId(self.next_slot);
        self.next_slot += 1;

        let link = document.link(&self.article_base_url);
        let badges = document
            .problems
            .iter()
            .map(|tag| ProblemBadge {
                tag: *tag,
                label: tag.label(),
                explanation: tag.explanation(),
                href: format!("{}{}", link, tag.anchor()),
            })
            .collect();

        ResultEntry {
            slot,
            page_id: document.page_id.clone(),
            link,
            title: String::new(),
            description: String::new(),
            metadata: MetadataState::Pending,
            badges,
        }
    }

    /// Fill in the title of one entry. `None` marks the lookup as failed.
    ///
    /// Returns `false` when the slot is no longer rendered.
    pub fn fill_metadata(&mut self, slot: SlotId, metadata: Option<PageMetadata>) -> bool {
        let Some(&index) = self.slots.get(&slot) else {
            return false;
        };
        let entry = &mut self.entries[index];
        match metadata {
            Some(meta) => {
                entry.title = meta.title;
                entry.description = meta.description;
                entry.metadata = MetadataState::Loaded;
            }
            None => entry.metadata = MetadataState::Unavailable,
        }
        true
    }

    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    pub fn entry(&self, slot: SlotId) -> Option<&ResultEntry> {
        self.slots.get(&slot).map(|&index| &self.entries[index])
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn has_load_more(&self) -> bool {
        self.load_more
    }

    pub fn breadcrumb(&self) -> &[String] {
        &self.breadcrumb
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://de.wikipedia.org/wiki/";

    fn page(ids: &[&str], has_more: bool) -> ResultPage {
        ResultPage {
            documents: ids
                .iter()
                .map(|id| Document::new(*id, [ProblemTag::Veraltet, ProblemTag::BelegeFehlen]))
                .collect(),
            has_more,
            skipped: 0,
        }
    }

    #[test]
    fn test_badges_render_before_metadata() {
        let mut renderer = ResultRenderer::new(BASE);
        let lookups = renderer.render_page(&page(&["Katze"], true), false);

        assert_eq!(lookups.len(), 1);
        assert_eq!(lookups[0].page_id, "Katze");
        let entry = &renderer.entries()[0];
        assert_eq!(entry.metadata, MetadataState::Pending);
        assert_eq!(entry.title, "");
        assert_eq!(entry.badges.len(), 2);
        assert_eq!(entry.badges[0].label, "Veraltet");
        assert_eq!(entry.badges[0].href, "https://de.wikipedia.org/wiki/Katze");
        assert_eq!(
            entry.badges[1].href,
            "https://de.wikipedia.org/wiki/Katze#Einzelnachweise"
        );
        assert!(renderer.has_load_more());
    }

    #[test]
    fn test_append_keeps_order_and_existing_entries() {
        let mut renderer = ResultRenderer::new(BASE);
        let first = renderer.render_page(&page(&["A", "B"], true), false);
        renderer.fill_metadata(
            first[0].slot,
            Some(PageMetadata {
                title: "A-Titel".to_string(),
                description: String::new(),
            }),
        );

        renderer.render_page(&page(&["C"], false), true);

        let ids: Vec<_> = renderer.entries().iter().map(|e| e.page_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(renderer.entries()[0].title, "A-Titel");
        assert!(!renderer.has_load_more());
    }

    #[test]
    fn test_metadata_fills_only_its_slot_in_any_order() {
        let mut renderer = ResultRenderer::new(BASE);
        let lookups = renderer.render_page(&page(&["A", "B", "C"], false), false);

        renderer.fill_metadata(
            lookups[2].slot,
            Some(PageMetadata {
                title: "C".to_string(),
                description: "dritter".to_string(),
            }),
        );
        renderer.fill_metadata(lookups[1].slot, None);
        renderer.fill_metadata(
            lookups[0].slot,
            Some(PageMetadata {
                title: "A".to_string(),
                description: "erster".to_string(),
            }),
        );

        let entries = renderer.entries();
        assert_eq!(entries[0].title, "A");
        assert_eq!(entries[1].title, "");
        assert_eq!(entries[1].metadata, MetadataState::Unavailable);
        assert_eq!(entries[1].badges.len(), 2);
        assert_eq!(entries[2].description, "dritter");
    }

    #[test]
    fn test_cleared_slot_is_ignored() {
        let mut renderer = ResultRenderer::new(BASE);
        let old = renderer.render_page(&page(&["Alt"], false), false);
        renderer.render_page(&page(&["Neu"], false), false);

        assert!(!renderer.fill_metadata(
            old[0].slot,
            Some(PageMetadata {
                title: "Alt".to_string(),
                description: String::new(),
            })
        ));
        assert_eq!(renderer.entries()[0].title, "");
    }

    #[test]
    fn test_render_page_replaces_notice() {
        let mut renderer = ResultRenderer::new(BASE);
        renderer.show_notice(Notice::PleaseWait);
        renderer.render_page(&page(&["Katze"], false), false);
        assert_eq!(renderer.notice(), None);
        assert!(Notice::FindFailed.is_retryable());
        assert!(!Notice::NoResults.is_retryable());
    }
}
