use crate::labels;
use crate::render::{MetadataState, ResultEntry, ResultRenderer, SlotId};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::Paragraph,
    Frame,
};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

/// Scrollable view of the rendered results with a selection cursor
pub struct ResultList {
    selected: usize,
    scroll_offset: u16,
}

impl ResultList {
    pub fn new() -> Self {
        Self {
            selected: 0,
            scroll_offset: 0,
        }
    }

    pub fn select_next(&mut self, results: &ResultRenderer, steps: usize) {
        let last = results.len().saturating_sub(1);
        self.selected = (self.selected + steps).min(last);
    }

    pub fn select_prev(&mut self, steps: usize) {
        self.selected = self.selected.saturating_sub(steps);
    }

    /// Reset selection and scrolling, e.g. after a new search
    pub fn reset(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn selected_slot(&self, results: &ResultRenderer) -> Option<SlotId> {
        results.entries().get(self.selected).map(|e| e.slot)
    }

    /// Wrap text to fit within the given width
    fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        wrap(text, max_width.max(10))
            .into_iter()
            .map(|cow| cow.to_string())
            .collect()
    }

    /// Lay badges out left to right, breaking lines at `max_width`
    fn badge_lines(entry: &ResultEntry, max_width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let mut current: Vec<Span<'static>> = vec![Span::raw("    ")];
        let mut used = 4;

        for badge in &entry.badges {
            let text = format!("[{}]", badge.label);
            let width = text.width() + 1;
            if used + width > max_width && current.len() > 1 {
                lines.push(Line::from(std::mem::take(&mut current)));
                current.push(Span::raw("    "));
                used = 4;
            }
            current.push(Span::styled(
                text,
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::LightYellow),
            ));
            current.push(Span::raw(" "));
            used += width;
        }
        if current.len() > 1 {
            lines.push(Line::from(current));
        }
        lines
    }

    fn entry_lines(entry: &ResultEntry, selected: bool, width: usize) -> Vec<Line<'static>> {
        let marker = if selected { "▶ " } else { "  " };
        let title_style = if selected {
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };

        let title = match entry.metadata {
            MetadataState::Loaded if !entry.title.is_empty() => {
                Span::styled(entry.title.clone(), title_style)
            }
            MetadataState::Pending => Span::styled("…", Style::default().fg(Color::DarkGray)),
            // Blank title: the page id stays visible so the entry can still be identified.
            _ => Span::styled(
                entry.page_id.clone(),
                Style::default().fg(Color::DarkGray),
            ),
        };

        let mut lines = vec![Line::from(vec![Span::raw(marker), title])];
        for line in Self::wrap_text(&entry.description, width.saturating_sub(4)) {
            lines.push(Line::from(Span::styled(
                format!("    {line}"),
                Style::default().fg(Color::Gray),
            )));
        }
        lines.extend(Self::badge_lines(entry, width));
        if selected {
            for badge in &entry.badges {
                lines.push(Line::from(Span::styled(
                    format!("    {}: {} ({})", badge.label, badge.explanation, badge.href),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        lines.push(Line::default());
        lines
    }

    /// Render the result list
    pub fn render(&mut self, frame: &mut Frame, area: Rect, results: &ResultRenderer) {
        self.selected = self.selected.min(results.len().saturating_sub(1));

        let width = area.width as usize;
        let mut lines: Vec<Line<'static>> = Vec::new();

        if !results.breadcrumb().is_empty() {
            lines.push(Line::from(Span::styled(
                results.breadcrumb().join(labels::CRUMB_SEPARATOR),
                Style::default().fg(Color::LightBlue),
            )));
            lines.push(Line::default());
        }

        let mut selected_range = (0u16, 0u16);
        for (i, entry) in results.entries().iter().enumerate() {
            let start = lines.len() as u16;
            lines.extend(Self::entry_lines(entry, i == self.selected, width));
            if i == self.selected {
                selected_range = (start, lines.len() as u16);
            }
        }

        if let Some(notice) = results.notice() {
            let mut text = notice.text().to_string();
            if notice.is_retryable() {
                text.push_str(&format!(" ({} mit Ctrl+R)", labels::RETRY));
            }
            lines.push(Line::from(Span::styled(
                text,
                Style::default().fg(Color::LightRed),
            )));
        }

        if results.has_load_more() {
            lines.push(Line::from(Span::styled(
                format!("[{} – Ctrl+N]", labels::LOAD_MORE),
                Style::default()
                    .fg(Color::LightGreen)
                    .add_modifier(Modifier::BOLD),
            )));
        }

        // Keep the selected entry in view.
        let (start, end) = selected_range;
        if start < self.scroll_offset {
            self.scroll_offset = start;
        } else if end > self.scroll_offset + area.height {
            self.scroll_offset = end.saturating_sub(area.height);
        }
        let max_scroll = (lines.len() as u16).saturating_sub(area.height);
        self.scroll_offset = self.scroll_offset.min(max_scroll);

        let paragraph = Paragraph::new(Text::from(lines)).scroll((self.scroll_offset, 0));
        frame.render_widget(paragraph, area);
    }
}

impl Default for ResultList {
    fn default() -> Self {
        Self::new()
    }
}
