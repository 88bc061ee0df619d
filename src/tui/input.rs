use crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders},
    Frame,
};
use tui_textarea::TextArea;

/// Single-line query field wrapped around tui-textarea
pub struct InputWidget {
    textarea: TextArea<'static>,
}

impl InputWidget {
    pub fn new() -> Self {
        Self {
            textarea: Self::fresh_textarea(""),
        }
    }

    fn fresh_textarea(text: &str) -> TextArea<'static> {
        let mut textarea = TextArea::new(vec![text.to_string()]);
        textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(Span::styled(
                    " Thema (Enter=suchen │ Tab=vervollständigen) ",
                    Style::default()
                        .fg(Color::LightBlue)
                        .add_modifier(Modifier::BOLD),
                ))
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        textarea.set_cursor_line_style(Style::default());
        textarea.set_placeholder_text("z. B. Katzen");
        textarea.move_cursor(tui_textarea::CursorMove::End);
        textarea
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.textarea.input(key);
    }

    /// Current text
    pub fn text(&self) -> String {
        self.textarea.lines().join(" ")
    }

    /// Replace the text, cursor at the end
    pub fn set_text(&mut self, text: &str) {
        self.textarea = Self::fresh_textarea(text);
    }

    /// Get the current text and clear the input
    pub fn take_text(&mut self) -> String {
        let text = self.text();
        self.textarea = Self::fresh_textarea("");
        text
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(&self.textarea, area);
    }
}

impl Default for InputWidget {
    fn default() -> Self {
        Self::new()
    }
}
