use crate::autocomplete::Autocomplete;
use crate::controller::SearchController;
use crate::event::{Event, EventResult, WidgetEvent};
use crate::labels;
use crate::render::SentencePart;
use crate::tui::{InputWidget, ResultList};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

/// Suggestion badges reachable through F1..F9. Later badges are shown but
/// have no key.
const BADGE_KEYS: usize = 9;

/// Function key that clicks the badge at `index`, if it has one
fn badge_key(index: usize) -> Option<u8> {
    (index < BADGE_KEYS).then(|| index as u8 + 1)
}

/// Terminal host of the search widget
pub struct App {
    controller: SearchController,
    autocomplete: Autocomplete,
    /// Query field
    pub input: InputWidget,
    result_list: ResultList,
    /// Last host-side message (e.g. the link that was opened)
    note: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(controller: SearchController, autocomplete: Autocomplete) -> Self {
        Self {
            controller,
            autocomplete,
            input: InputWidget::new(),
            result_list: ResultList::new(),
            note: None,
            should_quit: false,
        }
    }

    pub fn controller(&self) -> &SearchController {
        &self.controller
    }

    /// Check if the application should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Handle an event
    pub fn handle_event(&mut self, event: Event) -> EventResult<()> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Widget(WidgetEvent::AutocompleteCompleted {
                request_id,
                outcome,
            }) => {
                self.autocomplete.on_result(request_id, outcome);
                Ok(())
            }
            Event::Widget(widget) => {
                self.controller.handle_event(widget);
                Ok(())
            }
            Event::Resize(..) | Event::Tick => Ok(()),
        }
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyEvent) -> EventResult<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('n') if ctrl => self.controller.load_more(),
            KeyCode::Char('r') if ctrl => self.controller.retry(),
            KeyCode::Char('o') if ctrl => self.open_selected(),
            KeyCode::Char('b') if ctrl => {
                let crumbs = self.controller.results().breadcrumb().to_vec();
                if !crumbs.is_empty() {
                    self.controller.on_category_breadcrumb_click(&crumbs);
                    self.note = Some(crumbs.join(labels::CRUMB_SEPARATOR));
                }
            }
            KeyCode::Up => self.result_list.select_prev(1),
            KeyCode::Down => self
                .result_list
                .select_next(self.controller.results(), 1),
            KeyCode::PageUp => self.result_list.select_prev(5),
            KeyCode::PageDown => self
                .result_list
                .select_next(self.controller.results(), 5),
            KeyCode::F(n) if (1..=BADGE_KEYS).contains(&usize::from(n)) => {
                self.click_suggestion(usize::from(n) - 1)
            }
            KeyCode::Tab => {
                if let Some(candidate) = self.autocomplete.first().map(str::to_string) {
                    self.input.set_text(&candidate);
                    self.autocomplete.clear();
                }
            }
            KeyCode::Enter => {
                let text = self.input.take_text();
                self.autocomplete.clear();
                self.start_search(|controller| controller.submit(&text));
            }
            _ => {
                self.input.handle_key(key);
                self.autocomplete.request(&self.input.text());
            }
        }
        Ok(())
    }

    fn click_suggestion(&mut self, index: usize) {
        let topic = self
            .controller
            .suggestions()
            .current()
            .and_then(|sentence| sentence.badge(index))
            .map(str::to_string);

        if let Some(topic) = topic {
            self.input.set_text(&topic);
            self.start_search(|controller| controller.on_badge_click(&topic));
        }
    }

    fn start_search(&mut self, action: impl FnOnce(&mut SearchController)) {
        action(&mut self.controller);
        self.result_list.reset();
        self.note = None;
    }

    fn open_selected(&mut self) {
        let Some(slot) = self.result_list.selected_slot(self.controller.results()) else {
            return;
        };
        if let Some(link) = self.controller.on_result_click(slot) {
            self.note = Some(format!("Geöffnet: {link}"));
        }
    }

    /// Show the opening suggestions, as the page does when it loads
    pub fn mount(&mut self) {
        self.start_search(SearchController::mount);
    }

    /// Render the application UI
    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Query
                Constraint::Length(4), // Suggestions / completions
                Constraint::Min(3),    // Results
                Constraint::Length(3), // Status bar
            ])
            .split(frame.area());

        self.input.render(frame, chunks[0]);
        self.render_hints(frame, chunks[1]);
        self.render_results(frame, chunks[2]);
        self.render_status(frame, chunks[3]);
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect) {
        let mut lines = Vec::new();

        if !self.autocomplete.candidates().is_empty() {
            let shown: Vec<&str> = self
                .autocomplete
                .candidates()
                .iter()
                .take(5)
                .map(String::as_str)
                .collect();
            lines.push(Line::from(vec![
                Span::styled("Tab: ", Style::default().fg(Color::Yellow)),
                Span::raw(shown.join(" · ")),
            ]));
        }

        if let Some(sentence) = self.controller.suggestions().current() {
            let spans: Vec<Span> = sentence
                .parts()
                .into_iter()
                .map(|part| match part {
                    SentencePart::Text(text) => Span::raw(text),
                    SentencePart::Badge { index, topic } => Span::styled(
                        match badge_key(index) {
                            Some(key) => format!("[F{key} {topic}]"),
                            None => format!("[{topic}]"),
                        },
                        Style::default()
                            .fg(Color::LightCyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                })
                .collect();
            lines.push(Line::from(spans));
        }

        let hints = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(hints, area);
    }

    fn render_results(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title("Artikel")
            .border_style(Style::default().fg(Color::White));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.result_list
            .render(frame, inner, self.controller.results());
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled("Status: ", Style::default().fg(Color::Yellow)),
            Span::raw(self.controller.state().to_string()),
            Span::raw(" | "),
            Span::styled("Artikel: ", Style::default().fg(Color::Cyan)),
            Span::raw(self.controller.results().len().to_string()),
        ];
        if let Some(note) = &self.note {
            spans.push(Span::raw(" | "));
            spans.push(Span::raw(note.clone()));
        }
        spans.push(Span::styled(
            " | ↑↓ Auswahl · Ctrl+O öffnen · Ctrl+B Kategorie · Ctrl+C beenden",
            Style::default().fg(Color::DarkGray),
        ));

        let status = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Status")
                .border_style(Style::default().fg(Color::White)),
        );

        frame.render_widget(status, area);
    }
}
